use std::path::PathBuf;

use crate::layout::VertexSemantic;
use crate::mesh::PrimitiveType;

/// Errors produced while building, loading or exporting meshes.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("mesh has no vertices")]
    NoVertices,

    #[error("mesh has no submeshes")]
    NoSubmeshes,

    #[error("{stream} stream has {actual} entries, expected {expected}")]
    StreamLength {
        stream: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("submesh `{submesh}` references vertex {index} but the mesh has {vertex_count}")]
    IndexOutOfRange {
        submesh: String,
        index: u32,
        vertex_count: usize,
    },

    #[error("submesh `{submesh}` has {count} indices, not a positive multiple of {arity} ({primitive:?})")]
    IndexCount {
        submesh: String,
        count: usize,
        arity: usize,
        primitive: PrimitiveType,
    },

    #[error("vertex layout requires {0:?} but the mesh does not provide it")]
    MissingAttribute(VertexSemantic),

    #[error("invalid primitive parameters: {0}")]
    InvalidPrimitive(String),

    #[error("cannot export {primitive:?} submesh `{submesh}` to OBJ")]
    UnsupportedPrimitive {
        submesh: String,
        primitive: PrimitiveType,
    },

    #[error("OBJ asset contains no faces")]
    EmptyAsset,

    #[error("failed to parse OBJ: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Write(#[from] std::io::Error),
}

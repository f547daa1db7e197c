//! Mesh data model, procedural primitives and Wavefront OBJ import/export.
//!
//! This crate has no GPU dependencies so it can be used by asset tooling and
//! tests without a device. Renderers consume a [`Mesh`] by interleaving it for
//! a [`VertexLayout`] and uploading the bytes plus each submesh's indices.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`mesh`] | `Mesh`, `Submesh`, `PrimitiveType`, `Bounds` |
//! | [`layout`] | `VertexLayout`, `VertexAttribute`, `VertexSemantic` |
//! | [`primitives`] | `cube`, `cone`, `sphere` generators |
//! | [`obj`] | `load`, `parse`, `export`, `write` |
//! | [`error`] | `MeshError` |
//!
//! # Quick start
//!
//! ```rust
//! use ember_mesh::{primitives, VertexLayout};
//!
//! let cube = primitives::cube(1.0).unwrap();
//! assert_eq!(cube.index_count(), 36);
//!
//! let bytes = cube.interleave(&VertexLayout::position()).unwrap();
//! assert_eq!(bytes.len(), cube.vertex_count() * 12);
//! ```

pub mod error;
pub mod layout;
pub mod mesh;
pub mod obj;
pub mod primitives;

pub use error::MeshError;
pub use layout::{VertexAttribute, VertexFormat, VertexLayout, VertexSemantic};
pub use mesh::{Bounds, Mesh, PrimitiveType, Submesh};

use crate::error::MeshError;
use crate::layout::{VertexLayout, VertexSemantic};

/// How a submesh's indices are assembled into primitives.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum PrimitiveType {
    #[default]
    Triangles,
    Lines,
    Points,
}

impl PrimitiveType {
    /// Indices consumed per primitive.
    #[inline]
    pub const fn arity(self) -> usize {
        match self {
            PrimitiveType::Triangles => 3,
            PrimitiveType::Lines => 2,
            PrimitiveType::Points => 1,
        }
    }
}

/// A named index range drawn with the mesh's shared vertex buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Submesh {
    name: String,
    primitive: PrimitiveType,
    indices: Vec<u32>,
}

impl Submesh {
    pub fn new(name: impl Into<String>, primitive: PrimitiveType, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            primitive,
            indices,
        }
    }

    /// Triangle-list submesh.
    pub fn triangles(name: impl Into<String>, indices: Vec<u32>) -> Self {
        Self::new(name, PrimitiveType::Triangles, indices)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Axis-aligned bounding box of a mesh's positions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    pub fn from_points(points: &[[f32; 3]]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut b = Bounds {
            min: *first,
            max: *first,
        };
        for p in rest {
            for axis in 0..3 {
                b.min[axis] = b.min[axis].min(p[axis]);
                b.max[axis] = b.max[axis].max(p[axis]);
            }
        }
        Some(b)
    }

    pub fn extent(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }
}

/// CPU-side mesh: vertex streams plus an ordered list of submeshes.
///
/// Invariants (checked by [`Mesh::new`]):
/// - at least one vertex and one submesh
/// - optional streams match the position count
/// - every index addresses an existing vertex
/// - every submesh has a positive index count divisible by its primitive arity
///
/// The mesh is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    tex_coords: Option<Vec<[f32; 2]>>,
    submeshes: Vec<Submesh>,
}

impl Mesh {
    pub fn new(
        positions: Vec<[f32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
        tex_coords: Option<Vec<[f32; 2]>>,
        submeshes: Vec<Submesh>,
    ) -> Result<Self, MeshError> {
        if positions.is_empty() {
            return Err(MeshError::NoVertices);
        }
        if submeshes.is_empty() {
            return Err(MeshError::NoSubmeshes);
        }

        let vertex_count = positions.len();
        if let Some(n) = &normals {
            check_stream_len("normal", vertex_count, n.len())?;
        }
        if let Some(t) = &tex_coords {
            check_stream_len("texcoord", vertex_count, t.len())?;
        }

        for submesh in &submeshes {
            let arity = submesh.primitive.arity();
            let count = submesh.indices.len();
            if count == 0 || count % arity != 0 {
                return Err(MeshError::IndexCount {
                    submesh: submesh.name.clone(),
                    count,
                    arity,
                    primitive: submesh.primitive,
                });
            }
            if let Some(&index) = submesh
                .indices
                .iter()
                .find(|&&i| i as usize >= vertex_count)
            {
                return Err(MeshError::IndexOutOfRange {
                    submesh: submesh.name.clone(),
                    index,
                    vertex_count,
                });
            }
        }

        Ok(Self {
            positions,
            normals,
            tex_coords,
            submeshes,
        })
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn normals(&self) -> Option<&[[f32; 3]]> {
        self.normals.as_deref()
    }

    #[inline]
    pub fn tex_coords(&self) -> Option<&[[f32; 2]]> {
        self.tex_coords.as_deref()
    }

    #[inline]
    pub fn submeshes(&self) -> &[Submesh] {
        &self.submeshes
    }

    /// Total index count across all submeshes.
    pub fn index_count(&self) -> usize {
        self.submeshes.iter().map(Submesh::index_count).sum()
    }

    pub fn has(&self, semantic: VertexSemantic) -> bool {
        match semantic {
            VertexSemantic::Position => true,
            VertexSemantic::Normal => self.normals.is_some(),
            VertexSemantic::TexCoord => self.tex_coords.is_some(),
        }
    }

    /// Layout containing every stream this mesh carries, in canonical order.
    pub fn natural_layout(&self) -> VertexLayout {
        let semantics: Vec<VertexSemantic> = [
            VertexSemantic::Position,
            VertexSemantic::Normal,
            VertexSemantic::TexCoord,
        ]
        .into_iter()
        .filter(|&s| self.has(s))
        .collect();
        VertexLayout::new(&semantics)
    }

    pub fn bounds(&self) -> Bounds {
        // `positions` is non-empty by construction.
        Bounds::from_points(&self.positions).unwrap_or(Bounds {
            min: [0.0; 3],
            max: [0.0; 3],
        })
    }

    /// Packs the vertex streams into one interleaved buffer following `layout`.
    ///
    /// Fails if the layout asks for a stream this mesh does not have, or has no
    /// position attribute at all.
    pub fn interleave(&self, layout: &VertexLayout) -> Result<Vec<u8>, MeshError> {
        if !layout.contains(VertexSemantic::Position) {
            return Err(MeshError::MissingAttribute(VertexSemantic::Position));
        }
        for attr in layout.attributes() {
            if !self.has(attr.semantic) {
                return Err(MeshError::MissingAttribute(attr.semantic));
            }
        }

        let floats_per_vertex = (layout.stride() as usize) / std::mem::size_of::<f32>();
        let mut out = vec![0.0f32; floats_per_vertex * self.vertex_count()];

        for (v, vertex) in out.chunks_exact_mut(floats_per_vertex).enumerate() {
            for attr in layout.attributes() {
                let start = attr.offset as usize / std::mem::size_of::<f32>();
                let values: &[f32] = match attr.semantic {
                    VertexSemantic::Position => &self.positions[v],
                    VertexSemantic::Normal => match &self.normals {
                        Some(n) => &n[v],
                        None => continue,
                    },
                    VertexSemantic::TexCoord => match &self.tex_coords {
                        Some(t) => &t[v],
                        None => continue,
                    },
                };
                vertex[start..start + values.len()].copy_from_slice(values);
            }
        }

        Ok(bytemuck::cast_slice(&out).to_vec())
    }
}

fn check_stream_len(stream: &'static str, expected: usize, actual: usize) -> Result<(), MeshError> {
    if expected == actual {
        Ok(())
    } else {
        Err(MeshError::StreamLength {
            stream,
            expected,
            actual,
        })
    }
}

//! Interleaved vertex layouts.
//!
//! A [`VertexLayout`] describes how a mesh's vertex streams are packed into a
//! single interleaved buffer. Renderers derive their pipeline vertex descriptor
//! from the same layout, so a mesh/pipeline mismatch is caught when the mesh is
//! interleaved rather than at draw time.

/// Which vertex stream an attribute is read from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexSemantic {
    Position,
    Normal,
    TexCoord,
}

impl VertexSemantic {
    /// Natural storage format of the stream.
    pub const fn format(self) -> VertexFormat {
        match self {
            VertexSemantic::Position | VertexSemantic::Normal => VertexFormat::Float32x3,
            VertexSemantic::TexCoord => VertexFormat::Float32x2,
        }
    }
}

/// Attribute storage format.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
}

impl VertexFormat {
    #[inline]
    pub const fn components(self) -> usize {
        match self {
            VertexFormat::Float32x2 => 2,
            VertexFormat::Float32x3 => 3,
        }
    }

    #[inline]
    pub const fn size(self) -> u64 {
        (self.components() * std::mem::size_of::<f32>()) as u64
    }
}

/// One attribute inside an interleaved vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    pub semantic: VertexSemantic,
    pub format: VertexFormat,
    /// Byte offset from the start of the vertex.
    pub offset: u64,
    pub shader_location: u32,
}

/// Ordered attribute list plus the interleaved stride.
///
/// Shader locations follow declaration order, starting at 0.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: u64,
}

impl VertexLayout {
    /// Builds a tightly packed layout from the given semantics.
    ///
    /// Duplicate semantics are ignored after their first occurrence.
    pub fn new(semantics: &[VertexSemantic]) -> Self {
        let mut attributes: Vec<VertexAttribute> = Vec::with_capacity(semantics.len());
        let mut offset = 0u64;

        for &semantic in semantics {
            if attributes.iter().any(|a| a.semantic == semantic) {
                continue;
            }
            let format = semantic.format();
            attributes.push(VertexAttribute {
                semantic,
                format,
                offset,
                shader_location: attributes.len() as u32,
            });
            offset += format.size();
        }

        Self {
            attributes,
            stride: offset,
        }
    }

    /// Position only (`float3`), 12-byte stride.
    pub fn position() -> Self {
        Self::new(&[VertexSemantic::Position])
    }

    /// Position, normal, texture coordinate; 32-byte stride.
    pub fn position_normal_uv() -> Self {
        Self::new(&[
            VertexSemantic::Position,
            VertexSemantic::Normal,
            VertexSemantic::TexCoord,
        ])
    }

    #[inline]
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    #[inline]
    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn attribute(&self, semantic: VertexSemantic) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.semantic == semantic)
    }

    #[inline]
    pub fn contains(&self, semantic: VertexSemantic) -> bool {
        self.attribute(semantic).is_some()
    }
}

impl Default for VertexLayout {
    fn default() -> Self {
        Self::position_normal_uv()
    }
}

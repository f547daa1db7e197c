use std::ops::Range;

use anyhow::{Context, Result, ensure};
use wgpu::util::DeviceExt;

use ember_mesh::{Mesh, PrimitiveType, VertexLayout};

use super::RenderCtx;

/// A mesh uploaded for one vertex layout.
///
/// One interleaved vertex buffer, one index buffer holding every submesh back
/// to back, and the index range of each submesh inside it.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    ranges: Vec<DrawRange>,
    primitive: PrimitiveType,
}

/// Index range of one submesh in the shared index buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRange {
    pub name: String,
    pub indices: Range<u32>,
}

/// Concatenates submesh indices and records where each one lands.
fn pack_indices(mesh: &Mesh) -> (Vec<u32>, Vec<DrawRange>) {
    let mut indices = Vec::with_capacity(mesh.index_count());
    let mut ranges = Vec::with_capacity(mesh.submeshes().len());

    for submesh in mesh.submeshes() {
        let start = indices.len() as u32;
        indices.extend_from_slice(submesh.indices());
        ranges.push(DrawRange {
            name: submesh.name().to_string(),
            indices: start..indices.len() as u32,
        });
    }

    (indices, ranges)
}

/// The one primitive type shared by every submesh.
///
/// A single pipeline has a single topology, so mixed meshes are refused.
pub(crate) fn common_primitive(mesh: &Mesh) -> Result<PrimitiveType> {
    let first = mesh
        .submeshes()
        .first()
        .map(|s| s.primitive())
        .context("mesh has no submeshes")?;
    if let Some(other) = mesh.submeshes().iter().find(|s| s.primitive() != first) {
        anyhow::bail!(
            "submesh `{}` is {:?} but the mesh draws {:?}; one pipeline cannot mix topologies",
            other.name(),
            other.primitive(),
            first
        );
    }
    Ok(first)
}

impl GpuMesh {
    /// Uploads pre-interleaved vertex bytes (see [`Mesh::interleave`]).
    pub fn upload(
        ctx: &RenderCtx<'_>,
        mesh: &Mesh,
        layout: &VertexLayout,
        vertex_bytes: &[u8],
    ) -> Result<Self> {
        ensure!(
            vertex_bytes.len() as u64 == layout.stride() * mesh.vertex_count() as u64,
            "vertex data does not match layout: {} bytes for {} vertices of stride {}",
            vertex_bytes.len(),
            mesh.vertex_count(),
            layout.stride()
        );
        let primitive = common_primitive(mesh)?;
        let (indices, ranges) = pack_indices(mesh);

        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("ember mesh vbo"),
                contents: vertex_bytes,
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("ember mesh ibo"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        log::debug!(
            "uploaded mesh: {} vertices ({} bytes), {} indices in {} submeshes",
            mesh.vertex_count(),
            vertex_bytes.len(),
            indices.len(),
            ranges.len()
        );

        Ok(Self {
            vertex_buffer,
            index_buffer,
            ranges,
            primitive,
        })
    }

    #[inline]
    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    #[inline]
    pub fn index_buffer(&self) -> &wgpu::Buffer {
        &self.index_buffer
    }

    #[inline]
    pub fn ranges(&self) -> &[DrawRange] {
        &self.ranges
    }

    #[inline]
    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    /// Binds the buffers and issues one indexed draw per submesh.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for range in &self.ranges {
            rpass.draw_indexed(range.indices.clone(), 0, 0..1);
        }
    }
}

use anyhow::{Context, Result};

use ember_mesh::{Mesh, VertexLayout};

use crate::time::{DEFAULT_STEP, Phase};

use super::color::Color;
use super::gpu_mesh::GpuMesh;
use super::pipeline::{FillMode, FrameUniform, MeshPipeline};
use super::scope;
use super::shader::{MESH_SHADER, ShaderSource};
use super::{RenderCtx, RenderTarget};

/// Renderer options.
#[derive(Debug, Clone)]
pub struct MeshRendererConfig {
    /// Flat color written by the fragment stage.
    pub color: Color,
    pub fill_mode: FillMode,
    /// Advance the phase once per rendered frame. When off, the phase input
    /// stays at zero and the mesh does not move.
    pub animate: bool,
    pub phase_step: f32,
    pub shader: ShaderSource,
}

impl Default for MeshRendererConfig {
    fn default() -> Self {
        Self {
            color: Color::RED,
            fill_mode: FillMode::Solid,
            animate: false,
            phase_step: DEFAULT_STEP,
            shader: MESH_SHADER,
        }
    }
}

/// One pipeline, one uploaded mesh and the per-frame uniform.
///
/// Construction either yields a fully usable renderer or an error; there is no
/// half-built state to draw with.
pub struct MeshRenderer {
    pipeline: MeshPipeline,
    mesh: GpuMesh,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    color: Color,
    animate: bool,
    phase: Phase,
}

impl MeshRenderer {
    pub fn new(
        ctx: &RenderCtx<'_>,
        mesh: &Mesh,
        layout: &VertexLayout,
        config: MeshRendererConfig,
    ) -> Result<Self> {
        // CPU-side checks first; nothing exists on the GPU until all pass.
        let vertex_bytes = mesh
            .interleave(layout)
            .context("mesh does not match the pipeline vertex layout")?;
        config
            .shader
            .validate()
            .context("mesh shader failed validation")?;
        let phase = Phase::new(config.phase_step)?;

        let (pipeline, gpu_mesh, uniform_buffer, bind_group) =
            scope::validated(ctx.device, "mesh renderer setup", || {
                let gpu_mesh = GpuMesh::upload(ctx, mesh, layout, &vertex_bytes)?;
                let pipeline = MeshPipeline::new(
                    ctx,
                    &config.shader,
                    layout,
                    gpu_mesh.primitive(),
                    config.fill_mode,
                )?;

                let uniform_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("ember mesh frame ubo"),
                    size: std::mem::size_of::<FrameUniform>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });

                let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("ember mesh bind group"),
                    layout: pipeline.bind_group_layout(),
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });

                Ok((pipeline, gpu_mesh, uniform_buffer, bind_group))
            })?;

        log::info!(
            "mesh renderer ready: {} submeshes, {:?}",
            gpu_mesh.ranges().len(),
            pipeline.fill_mode()
        );

        Ok(Self {
            pipeline,
            mesh: gpu_mesh,
            uniform_buffer,
            bind_group,
            color: config.color,
            animate: config.animate,
            phase,
        })
    }

    #[inline]
    pub fn pipeline(&self) -> &MeshPipeline {
        &self.pipeline
    }

    #[inline]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Records one frame into `target`.
    ///
    /// The target is loaded, not cleared; the frame owner clears it.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let phase = if self.animate {
            self.phase.advance()
        } else {
            self.phase.value()
        };

        let uniform = FrameUniform {
            color: self.color.to_array(),
            phase,
            _pad: [0.0; 3],
        };
        ctx.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ember mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(self.pipeline.raw());
        rpass.set_bind_group(0, &self.bind_group, &[]);
        self.mesh.draw(&mut rpass);
    }
}

use anyhow::{Result, bail};
use bytemuck::{Pod, Zeroable};

use ember_mesh::{PrimitiveType, VertexFormat, VertexLayout, VertexSemantic};

use super::RenderCtx;
use super::scope;
use super::shader::ShaderSource;

/// How triangles are rasterized.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FillMode {
    #[default]
    Solid,
    /// Edges only. Needs `Features::POLYGON_MODE_LINE`.
    Wireframe,
}

impl FillMode {
    /// Downgrades `Wireframe` to `Solid` when the device cannot draw lines.
    pub fn resolve(self, features: wgpu::Features) -> Self {
        match self {
            FillMode::Wireframe if !features.contains(wgpu::Features::POLYGON_MODE_LINE) => {
                log::warn!("wireframe requested but POLYGON_MODE_LINE is unavailable; drawing solid");
                FillMode::Solid
            }
            mode => mode,
        }
    }

    fn polygon_mode(self) -> wgpu::PolygonMode {
        match self {
            FillMode::Solid => wgpu::PolygonMode::Fill,
            FillMode::Wireframe => wgpu::PolygonMode::Line,
        }
    }
}

/// Per-frame uniform, mirrored by `FrameUniform` in `mesh.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub color: [f32; 4],
    pub phase: f32,
    pub _pad: [f32; 3], // 16-byte alignment
}

pub(crate) fn to_wgpu_format(format: VertexFormat) -> wgpu::VertexFormat {
    match format {
        VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
        VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
    }
}

pub(crate) fn topology(primitive: PrimitiveType) -> wgpu::PrimitiveTopology {
    match primitive {
        PrimitiveType::Triangles => wgpu::PrimitiveTopology::TriangleList,
        PrimitiveType::Lines => wgpu::PrimitiveTopology::LineList,
        PrimitiveType::Points => wgpu::PrimitiveTopology::PointList,
    }
}

/// Translates a mesh layout into wgpu attributes.
///
/// The mesh shader reads position at location 0; a layout that puts it
/// anywhere else cannot feed that shader.
pub(crate) fn vertex_attributes(layout: &VertexLayout) -> Result<Vec<wgpu::VertexAttribute>> {
    match layout.attribute(VertexSemantic::Position) {
        Some(a) if a.shader_location == 0 => {}
        Some(a) => bail!(
            "vertex layout has position at location {}, shader expects 0",
            a.shader_location
        ),
        None => bail!("vertex layout has no position attribute"),
    }

    Ok(layout
        .attributes()
        .iter()
        .map(|a| wgpu::VertexAttribute {
            format: to_wgpu_format(a.format),
            offset: a.offset,
            shader_location: a.shader_location,
        })
        .collect())
}

/// The single pipeline-state object: shader pair, vertex layout and fill mode.
///
/// Built once and never mutated.
pub struct MeshPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    fill_mode: FillMode,
    primitive: PrimitiveType,
}

impl MeshPipeline {
    /// Creates the pipeline. The shader is expected to have passed
    /// [`ShaderSource::validate`]; whatever wgpu still rejects is returned as `Err`.
    pub fn new(
        ctx: &RenderCtx<'_>,
        shader: &ShaderSource,
        layout: &VertexLayout,
        primitive: PrimitiveType,
        fill_mode: FillMode,
    ) -> Result<Self> {
        let attributes = vertex_attributes(layout)?;
        let fill_mode = fill_mode.resolve(ctx.features());

        scope::validated(ctx.device, "mesh pipeline", || {
            Self::create(ctx, shader, layout, &attributes, primitive, fill_mode)
        })
    }

    fn create(
        ctx: &RenderCtx<'_>,
        shader: &ShaderSource,
        layout: &VertexLayout,
        attributes: &[wgpu::VertexAttribute],
        primitive: PrimitiveType,
        fill_mode: FillMode,
    ) -> Result<Self> {
        let module = shader.create_module(ctx.device);

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("ember mesh bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<FrameUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("ember mesh pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let buffers = [wgpu::VertexBufferLayout {
            array_stride: layout.stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }];

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("ember mesh pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some(shader.vertex_entry),
                    compilation_options: Default::default(),
                    buffers: &buffers,
                },

                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some(shader.fragment_entry),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: topology(primitive),
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: fill_mode.polygon_mode(),
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        log::debug!(
            "mesh pipeline created: {:?} {:?} stride {}",
            primitive,
            fill_mode,
            layout.stride()
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            fill_mode,
            primitive,
        })
    }

    #[inline]
    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    #[inline]
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Fill mode actually in use after feature fallback.
    #[inline]
    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    #[inline]
    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_32_bytes() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 32);
    }

    #[test]
    fn wireframe_falls_back_without_feature() {
        assert_eq!(
            FillMode::Wireframe.resolve(wgpu::Features::empty()),
            FillMode::Solid
        );
        assert_eq!(
            FillMode::Wireframe.resolve(wgpu::Features::POLYGON_MODE_LINE),
            FillMode::Wireframe
        );
        assert_eq!(FillMode::Solid.resolve(wgpu::Features::empty()), FillMode::Solid);
    }

    #[test]
    fn position_only_layout_maps_to_one_attribute() {
        let attrs = vertex_attributes(&VertexLayout::position()).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(attrs[0].offset, 0);
        assert_eq!(attrs[0].shader_location, 0);
    }

    #[test]
    fn full_layout_keeps_offsets() {
        let layout = VertexLayout::position_normal_uv();
        let attrs = vertex_attributes(&layout).unwrap();
        let offsets: Vec<u64> = attrs.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        assert_eq!(attrs[2].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn position_must_be_location_zero() {
        let layout = VertexLayout::new(&[VertexSemantic::Normal, VertexSemantic::Position]);
        assert!(vertex_attributes(&layout).is_err());

        let layout = VertexLayout::new(&[VertexSemantic::Normal]);
        assert!(vertex_attributes(&layout).is_err());
    }

    #[test]
    fn primitive_topologies() {
        assert_eq!(
            topology(PrimitiveType::Triangles),
            wgpu::PrimitiveTopology::TriangleList
        );
        assert_eq!(topology(PrimitiveType::Lines), wgpu::PrimitiveTopology::LineList);
        assert_eq!(topology(PrimitiveType::Points), wgpu::PrimitiveTopology::PointList);
    }
}

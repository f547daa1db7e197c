//! Offscreen renderer tests. Each one skips when the machine has no adapter.

use std::time::Duration;

use ember_engine::device::{GpuDevice, GpuInit};
use ember_engine::mesh::{VertexLayout, obj, primitives};
use ember_engine::render::{
    Color, FillMode, MeshRenderer, MeshRendererConfig, RenderCtx, RenderTarget, ShaderSource,
};
use ember_engine::time::DEFAULT_STEP;

const SIZE: u32 = 64;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const ROW_BYTES: u32 = SIZE * 4;

fn headless() -> Option<GpuDevice> {
    match pollster::block_on(GpuDevice::headless(&GpuInit::default())) {
        Ok(gpu) => Some(gpu),
        Err(err) => {
            eprintln!("skipping: {err:#}");
            None
        }
    }
}

struct Offscreen {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    readback: wgpu::Buffer,
}

impl Offscreen {
    fn new(device: &wgpu::Device) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("offscreen readback"),
            size: (ROW_BYTES * SIZE) as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            texture,
            view,
            readback,
        }
    }

    /// Clears to `clear`, records one renderer frame and returns the pixels.
    fn draw(&self, ctx: &RenderCtx<'_>, renderer: &mut MeshRenderer, clear: Color) -> Vec<u8> {
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let _clear = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        renderer.render(ctx, &mut RenderTarget::new(&mut encoder, &self.view));

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(ROW_BYTES),
                    rows_per_image: Some(SIZE),
                },
            },
            wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
        );
        let submission = ctx.queue.submit(Some(encoder.finish()));

        let slice = self.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).unwrap();
        });
        ctx.device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(submission),
                timeout: Some(Duration::from_secs(10)),
            })
            .unwrap();
        rx.recv().unwrap().unwrap();

        let pixels = slice.get_mapped_range().to_vec();
        self.readback.unmap();
        pixels
    }
}

fn pixel(pixels: &[u8], x: u32, y: u32) -> [u8; 4] {
    let at = (y * ROW_BYTES + x * 4) as usize;
    [pixels[at], pixels[at + 1], pixels[at + 2], pixels[at + 3]]
}

#[test]
fn solid_cube_covers_the_center_only() {
    let Some(gpu) = headless() else { return };
    let ctx = RenderCtx::new(gpu.device(), gpu.queue(), FORMAT);

    let cube = primitives::cube(1.0).unwrap();
    let mut renderer = MeshRenderer::new(
        &ctx,
        &cube,
        &cube.natural_layout(),
        MeshRendererConfig {
            color: Color::RED,
            fill_mode: FillMode::Solid,
            ..Default::default()
        },
    )
    .unwrap();

    let target = Offscreen::new(ctx.device);
    let pixels = target.draw(&ctx, &mut renderer, Color::BLACK);

    assert_eq!(pixel(&pixels, SIZE / 2, SIZE / 2), [255, 0, 0, 255]);
    assert_eq!(pixel(&pixels, 0, SIZE / 2), [0, 0, 0, 255]);
    assert_eq!(pixel(&pixels, SIZE / 2, 0), [0, 0, 0, 255]);
}

#[test]
fn animated_renderer_steps_the_timer_once_per_frame() {
    let Some(gpu) = headless() else { return };
    let ctx = RenderCtx::new(gpu.device(), gpu.queue(), FORMAT);

    let cube = primitives::cube(1.0).unwrap();
    let mut renderer = MeshRenderer::new(
        &ctx,
        &cube,
        &cube.natural_layout(),
        MeshRendererConfig {
            animate: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(renderer.phase().timer(), 0.0);

    let target = Offscreen::new(ctx.device);
    for frame in 1..=3u32 {
        target.draw(&ctx, &mut renderer, Color::BLACK);
        let expected = frame as f64 * DEFAULT_STEP as f64;
        assert!((renderer.phase().timer() - expected).abs() < 1e-9);
        assert_eq!(renderer.phase().frame_index(), frame as u64);
    }
}

#[test]
fn still_renderer_keeps_phase_at_zero() {
    let Some(gpu) = headless() else { return };
    let ctx = RenderCtx::new(gpu.device(), gpu.queue(), FORMAT);

    let cube = primitives::cube(1.0).unwrap();
    let mut renderer =
        MeshRenderer::new(&ctx, &cube, &cube.natural_layout(), Default::default()).unwrap();

    let target = Offscreen::new(ctx.device);
    target.draw(&ctx, &mut renderer, Color::BLACK);
    target.draw(&ctx, &mut renderer, Color::BLACK);
    assert_eq!(renderer.phase().timer(), 0.0);
}

#[test]
fn position_only_mesh_cannot_feed_full_layout() {
    let Some(gpu) = headless() else { return };
    let ctx = RenderCtx::new(gpu.device(), gpu.queue(), FORMAT);

    let mesh = obj::parse(&mut std::io::Cursor::new(
        "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
    ))
    .unwrap();
    let result = MeshRenderer::new(
        &ctx,
        &mesh,
        &VertexLayout::position_normal_uv(),
        Default::default(),
    );
    assert!(result.is_err());
}

#[test]
fn bad_phase_step_is_refused() {
    let Some(gpu) = headless() else { return };
    let ctx = RenderCtx::new(gpu.device(), gpu.queue(), FORMAT);

    let cube = primitives::cube(1.0).unwrap();
    for step in [-0.05, f32::NAN, f32::INFINITY] {
        let result = MeshRenderer::new(
            &ctx,
            &cube,
            &cube.natural_layout(),
            MeshRendererConfig {
                phase_step: step,
                ..Default::default()
            },
        );
        assert!(result.is_err(), "step {step} accepted");
    }
}

/// Valid WGSL, but its uniform is 48 bytes against a 32-byte binding.
const WIDE_UNIFORM_SHADER: ShaderSource = ShaderSource {
    label: "wide uniform",
    wgsl: r#"
struct Wide {
    color: vec4<f32>,
    phase: f32,
    tint: vec4<f32>,
};

@group(0) @binding(0) var<uniform> frame: Wide;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position.x + frame.phase, position.y, 0.5, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return frame.color * frame.tint;
}
"#,
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
};

#[test]
fn uniform_size_mismatch_is_an_error_not_a_panic() {
    WIDE_UNIFORM_SHADER.validate().unwrap();

    let Some(gpu) = headless() else { return };
    let ctx = RenderCtx::new(gpu.device(), gpu.queue(), FORMAT);

    let cube = primitives::cube(1.0).unwrap();
    let result = MeshRenderer::new(
        &ctx,
        &cube,
        &cube.natural_layout(),
        MeshRendererConfig {
            shader: WIDE_UNIFORM_SHADER,
            ..Default::default()
        },
    );
    let err = result.err().expect("48-byte uniform must not bind to 32 bytes");
    assert!(format!("{err:#}").contains("rejected by wgpu"));
}

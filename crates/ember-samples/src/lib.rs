//! Shared plumbing for the sample binaries.
//!
//! Each binary builds a [`Mesh`], then hands it to [`run_mesh`], which opens a
//! window and draws it with one [`MeshRenderer`] until the window closes.

use anyhow::Result;
use clap::Args;

use ember_engine::core::{App, AppControl, FrameCtx};
use ember_engine::device::GpuInit;
use ember_engine::logging::{LoggingConfig, init_logging};
use ember_engine::render::{Color, FillMode, MeshRenderer, MeshRendererConfig};
use ember_engine::window::{Runtime, RuntimeConfig};
use ember_mesh::{Mesh, VertexLayout};

/// Window and logging flags shared by every sample.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Initial window width in logical pixels.
    #[arg(long, default_value = "800")]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value = "600")]
    pub height: u32,

    /// Log filter in env_logger syntax (overrides RUST_LOG).
    #[arg(long)]
    pub log: Option<String>,
}

impl ViewArgs {
    pub fn init_logging(&self) {
        let config = match &self.log {
            Some(filter) => LoggingConfig::with_filter(filter.clone()),
            None => LoggingConfig::default(),
        };
        init_logging(config);
    }

    pub fn runtime_config(&self, title: &str) -> RuntimeConfig {
        RuntimeConfig::new(title).with_size(self.width.max(1) as f64, self.height.max(1) as f64)
    }
}

/// Device settings for the samples: wireframe support is asked for but not required.
pub fn gpu_init() -> GpuInit {
    GpuInit {
        optional_features: wgpu::Features::POLYGON_MODE_LINE,
        ..Default::default()
    }
}

/// Clears to a fixed color and draws one mesh.
pub struct MeshApp {
    renderer: MeshRenderer,
    clear: Color,
}

impl MeshApp {
    pub fn new(renderer: MeshRenderer, clear: Color) -> Self {
        Self { renderer, clear }
    }
}

impl App for MeshApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let renderer = &mut self.renderer;
        ctx.render(self.clear, |rctx, target| renderer.render(rctx, target))
    }
}

/// What a sample wants on screen.
pub struct Scene {
    pub mesh: Mesh,
    pub layout: VertexLayout,
    pub clear: Color,
    pub renderer: MeshRendererConfig,
}

/// Opens a window and renders `scene` until the user closes it.
pub fn run_mesh(title: &str, view: &ViewArgs, scene: Scene) -> Result<()> {
    let Scene {
        mesh,
        layout,
        clear,
        renderer,
    } = scene;

    Runtime::run(view.runtime_config(title), gpu_init(), move |rctx| {
        let renderer = MeshRenderer::new(rctx, &mesh, &layout, renderer)?;
        Ok(MeshApp::new(renderer, clear))
    })
}

/// `Wireframe` unless `solid` is set.
pub fn fill_mode(solid: bool) -> FillMode {
    if solid {
        FillMode::Solid
    } else {
        FillMode::Wireframe
    }
}

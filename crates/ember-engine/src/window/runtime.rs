use anyhow::{Context, Result, anyhow};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::render::RenderCtx;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl RuntimeConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.initial_size = LogicalSize::new(width, height);
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "ember".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, brings up the GPU for it and hands a [`RenderCtx`] to
    /// `build` to construct the app. Then drives `App::on_frame` on every redraw
    /// until the window closes, Escape is pressed or the app asks to exit.
    ///
    /// A failure anywhere in bootstrap or `build` stops the loop and is
    /// returned here.
    pub fn run<A, B>(config: RuntimeConfig, gpu_init: GpuInit, build: B) -> Result<()>
    where
        A: CoreApp + 'static,
        B: FnOnce(&RenderCtx<'_>) -> Result<A>,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, build);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A, B> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    build: Option<B>,

    app: Option<A>,
    entry: Option<WindowEntry>,

    error: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A, B> AppState<A, B>
where
    A: CoreApp + 'static,
    B: FnOnce(&RenderCtx<'_>) -> Result<A>,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, build: B) -> Self {
        Self {
            config,
            gpu_init,
            build: Some(build),
            app: None,
            entry: None,
            error: None,
            exit_requested: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error.get_or_insert(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn bootstrap(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let build = self
            .build
            .take()
            .ok_or_else(|| anyhow!("application was already built"))?;

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let app = entry.with_gpu(|gpu| {
            let rctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());
            build(&rctx)
        })?;

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        self.app = Some(app);
        Ok(())
    }
}

fn is_escape(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
}

impl<A, B> ApplicationHandler for AppState<A, B>
where
    A: CoreApp + 'static,
    B: FnOnce(&RenderCtx<'_>) -> Result<A>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.bootstrap(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw: the phase advances once per presented frame.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (Some(app), Some(entry)) = (self.app.as_mut(), self.entry.as_mut()) else {
            return;
        };

        let mut exit = app.on_window_event(window_id, &event) == AppControl::Exit;

        match &event {
            WindowEvent::CloseRequested => exit = true,

            WindowEvent::KeyboardInput { event: key, .. } if is_escape(key) => exit = true,

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                entry.with_mut(|fields| {
                    let mut ctx = FrameCtx {
                        window: WindowCtx {
                            id: window_id,
                            window: fields.window,
                        },
                        gpu: fields.gpu,
                    };
                    if app.on_frame(&mut ctx) == AppControl::Exit {
                        exit = true;
                    }
                });
            }

            _ => {}
        }

        if exit {
            log::info!("closing window");
            // Drop GPU resources before the surface's window goes away.
            self.app = None;
            self.entry = None;
            self.exit_requested = true;
            event_loop.exit();
        }
    }
}

// crates/engine_core/src/platform_runner.rs

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;

use engine_assets::Assets;
use engine_ecs::{Game, Interface};
use engine_shared::{Logger, Renderer};
use tracing::{error, info, warn};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::window::{Window, WindowBuilder};

use crate::app::App;
use crate::error::{EngineError, EngineResult};
use crate::input::InputPoller;
use crate::renderer::QuadRenderer;
use crate::time::FrameClock;

/// Simple, best-effort file logger for fatal errors.
fn log_fatal_error_to_file(message: &str) {
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open("engine_fatal.log")
    {
        let _ = writeln!(file, "{}", message);
    }
}

/// Owns App and runs the platform (winit) event loop.
/// This isolates OS interaction from the engine core.
pub struct PlatformRunner {
    app: App,
}

/// Everything the loop touches once the window exists.
struct Running {
    window: Arc<Window>,
    renderer: QuadRenderer,
    clock: FrameClock,
    input: InputPoller,
    game: Game,
    assets: Assets,
    logger: Logger,
    failure: Option<EngineError>,
}

impl PlatformRunner {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    pub fn start(self) -> EngineResult<()> {
        let App {
            config,
            game,
            assets,
            logger,
        } = self.app;

        let event_loop = EventLoop::new()?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&config.window.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    config.window.width,
                    config.window.height,
                ))
                .build(&event_loop)?,
        );

        let renderer = pollster::block_on(QuadRenderer::new(
            Arc::clone(&window),
            config.window.vsync,
            config.clear_color(),
        ))?;

        let mut running = Running {
            window,
            renderer,
            clock: FrameClock::new(),
            input: InputPoller::new(),
            game,
            assets,
            logger,
            failure: None,
        };
        running.init()?;
        info!(entities = running.game.len(), "game initialized, entering main loop");

        event_loop.run(|event, elwt| running.handle(event, elwt))?;

        match running.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Running {
    fn init(&mut self) -> EngineResult<()> {
        self.renderer.clear();
        let mut iface = Interface::new()
            .with_renderer(&mut self.renderer)
            .with_logger(&self.logger)
            .with_clock(&self.clock)
            .with_input(&self.input)
            .with_assets(&mut self.assets);
        self.game.init(&mut iface)?;
        Ok(())
    }

    /// poll input → clear → update → present
    fn handle(&mut self, event: Event<()>, elwt: &EventLoopWindowTarget<()>) {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { event: win_event, .. } => match win_event {
                WindowEvent::CloseRequested => elwt.exit(),

                WindowEvent::KeyboardInput { .. } | WindowEvent::Focused(_) => {
                    self.input.handle_event(&win_event);
                }

                WindowEvent::Resized(size) => self.renderer.resize(size),

                WindowEvent::RedrawRequested => self.present(elwt),

                _ => {}
            },

            Event::AboutToWait => {
                self.clock.tick();
                if let Err(err) = self.update() {
                    error!(error = %err, "game update failed, shutting down");
                    self.failure = Some(err);
                    elwt.exit();
                    return;
                }
                self.window.request_redraw();
            }

            _ => {}
        }
    }

    fn update(&mut self) -> EngineResult<()> {
        self.renderer.clear();
        let mut iface = Interface::new()
            .with_renderer(&mut self.renderer)
            .with_logger(&self.logger)
            .with_clock(&self.clock)
            .with_input(&self.input)
            .with_assets(&mut self.assets);
        self.game.update(&mut iface)?;
        Ok(())
    }

    fn present(&mut self, elwt: &EventLoopWindowTarget<()>) {
        match self.renderer.present() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                warn!("surface lost/outdated, reconfiguring swapchain");
                self.renderer.resize(self.window.inner_size());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                let msg = "[Renderer] FATAL: Out of GPU memory. Exiting.";
                error!("{msg}");
                log_fatal_error_to_file(msg);
                self.failure = Some(EngineError::OutOfMemory);
                elwt.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timeout, skipping this frame");
            }
        }
    }
}

use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    config::DemoConfig,
    demo::DemoState,
    frame_loop::{FrameHost, FrameLoop, FrameStatus, StopSignal},
    rendering::renderer::Renderer,
};

/// Redraw requests are winit's equivalent of a display refresh callback.
struct WindowHost<'a>(&'a Window);

impl FrameHost for WindowHost<'_> {
    fn request_frame(&mut self) {
        self.0.request_redraw();
    }
}

struct Running {
    renderer: Renderer,
    demo_state: DemoState,
}

enum AppState {
    Uninitialized,
    Running(Running),
}

struct App {
    config: DemoConfig,
    state: AppState,
    frame_loop: FrameLoop,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: DemoConfig, stop: StopSignal) -> Self {
        Self {
            config,
            state: AppState::Uninitialized,
            frame_loop: FrameLoop::new(stop),
            error: None,
        }
    }

    fn setup(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Running> {
        let window_config = &self.config.window;
        let window_attributes = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height))
            .with_resizable(false)
            .with_transparent(self.config.render.transparent_background);
        let window = event_loop
            .create_window(window_attributes)
            .context("Failed to create window")?;
        let window = Arc::new(window);

        let renderer = pollster::block_on(Renderer::new(window.clone(), &self.config.render))?;
        let demo_state = DemoState::new(renderer.size(), &self.config.scene);

        Ok(Running {
            renderer,
            demo_state,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        self.frame_loop.stop_signal().stop();
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, AppState::Uninitialized) {
            return;
        }

        match self.setup(event_loop) {
            Ok(running) => {
                running.renderer.window.request_redraw();
                self.state = AppState::Running(running);
            }
            Err(error) => self.fail(event_loop, error),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let AppState::Running(running) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                self.frame_loop.stop_signal().stop();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let window = running.renderer.window.clone();
                let mut host = WindowHost(&window);

                match self.frame_loop.tick(
                    &mut running.demo_state,
                    &mut host,
                    &mut running.renderer,
                ) {
                    Ok(FrameStatus::Continue) => {}
                    Ok(FrameStatus::Stopped) => {
                        log::info!("Stopped after {} frames", self.frame_loop.frames());
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        running.renderer.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Timeout");
                    }
                    Err(other) => {
                        log::error!("Unexpected error: {:?}", other);
                    }
                }
            }
            _ => (),
        }
    }
}

/// Runs the demo until the window closes or `stop` is raised.
pub fn run(config: DemoConfig, stop: StopSignal) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(config, stop);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

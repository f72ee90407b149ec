use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window as WinitWindow, WindowId};

use crate::engine::Engine;
use crate::platform::Platform;

#[derive(Default)]
pub struct WinitPlatform;

impl WinitPlatform {
    pub fn new() -> Self {
        WinitPlatform
    }
}

/// Borrows the engine for the lifetime of the event loop.
struct EngineRunner<'a> {
    engine: &'a mut Engine,
    failure: Option<anyhow::Error>,
}

impl EngineRunner<'_> {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let options = &self.engine.config().window;
        let attributes = WinitWindow::default_attributes()
            .with_title(options.title.clone())
            .with_inner_size(LogicalSize::new(options.width, options.height))
            .with_resizable(options.resizable);

        let winit_window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );
        info!("Created window with ID: {:?}", winit_window.id());
        self.engine.initialize(winit_window)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for EngineRunner<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Resumed can fire more than once on some platforms; one window is enough.
        if self.engine.is_initialized() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("The close button was pressed; stopping");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.engine.frame() {
                    self.fail(event_loop, err);
                }
            }
            other => self.engine.handle_window_event(&other),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // A minimised window has nothing to draw; sleep until the next event.
        if self.engine.is_minimized() {
            event_loop.set_control_flow(ControlFlow::Wait);
        } else {
            event_loop.set_control_flow(ControlFlow::Poll);
            self.engine.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.engine.shutdown();
    }
}

impl Platform for WinitPlatform {
    fn run(&mut self, engine: &mut Engine) -> Result<()> {
        info!("Starting event loop...");

        let event_loop = EventLoop::new().context("Failed to create event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = EngineRunner {
            engine,
            failure: None,
        };
        event_loop
            .run_app(&mut runner)
            .context("Event loop terminated with error")?;

        runner.failure.map_or(Ok(()), Err)
    }
}

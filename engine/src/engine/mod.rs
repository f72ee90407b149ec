use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing::{error, info};
use winit::event::WindowEvent;
use winit::window::Window as WinitWindow;

use crate::application::Application;
use crate::config::EngineConfig;
use crate::core::frame_clock::FrameClock;
use crate::logger::Logger;
use crate::platform::{Platform, platform_winit::WinitPlatform};
use crate::renderer::{RenderFrame, Renderer, renderer_vulkan::VulkanRenderer};
use crate::window::{Window, WindowState};

/// Hooks an application implements to take part in the engine's frame loop.
/// Every hook defaults to doing nothing.
pub trait EngineHandler {
    /// Called once the window and renderer exist.
    fn on_load(&mut self, _window: &WindowState) {}

    fn on_update(&mut self, _delta_seconds: f64) {}

    /// Called after `on_update`, before the frame is submitted.
    fn on_render(&mut self, _frame: &mut RenderFrame) {}

    /// Called before the renderer is released.
    fn on_shutdown(&mut self) {}
}

pub struct Engine {
    config: EngineConfig,
    handler: Box<dyn EngineHandler>,
    _logger: Logger,
    window: Option<Window>,
    window_state: WindowState,
    renderer: Option<Box<dyn Renderer>>,
    clock: FrameClock,
}

impl Engine {
    pub fn new(config: EngineConfig, handler: Box<dyn EngineHandler>) -> Engine {
        let _logger = Logger::new(&config.logging);
        Engine {
            config,
            handler,
            _logger,
            window: None,
            window_state: WindowState::default(),
            renderer: None,
            clock: FrameClock::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn window_state(&self) -> &WindowState {
        &self.window_state
    }

    pub fn is_initialized(&self) -> bool {
        self.renderer.is_some()
    }

    /// Brings up the renderer for `winit_window` and runs the load hook.
    pub fn initialize(&mut self, winit_window: Arc<WinitWindow>) -> Result<()> {
        let window = Window::new(winit_window);
        let renderer = VulkanRenderer::new(window.get_winit_window(), &self.config.renderer)?;
        self.window_state = window.current_state();
        self.window = Some(window);
        self.attach_renderer(Box::new(renderer));
        Ok(())
    }

    fn attach_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderer = Some(renderer);
        self.handler.on_load(&self.window_state);
        let (width, height) = self.window_state.size();
        info!("Engine loaded ({width}x{height})");
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Focused(is_focused) => {
                self.window_state.set_focused(*is_focused);
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size.width, new_size.height);
            }
            _ => (),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.window_state.set_size(width, height);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(width, height);
        }
    }

    /// Runs one update/render cycle.
    pub fn frame(&mut self) -> Result<()> {
        let renderer = self
            .renderer
            .as_mut()
            .ok_or_else(|| anyhow!("Renderer not initialized"))?;

        if self.window_state.minimized {
            // The time spent minimised must not show up as one huge delta.
            self.clock.pause();
            return Ok(());
        }

        let delta_seconds = self.clock.tick();
        self.handler.on_update(delta_seconds);

        let mut frame = RenderFrame::new(
            self.config.renderer.clear_color,
            delta_seconds,
            self.clock.frame_count() - 1,
        );
        self.handler.on_render(&mut frame);

        renderer.draw_frame(&frame)
    }

    pub fn is_minimized(&self) -> bool {
        self.window_state.minimized
    }

    /// Does nothing while minimised; the platform waits for events instead.
    pub fn request_redraw(&self) {
        if self.is_minimized() {
            return;
        }
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    /// Releases the renderer and window. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            self.handler.on_shutdown();
            drop(renderer);
            self.window = None;
            info!("Engine shut down");
        }
    }
}

impl Application for Engine {
    fn run(&mut self) {
        let mut platform = WinitPlatform::new();
        if let Err(err) = platform.run(self) {
            error!("Engine stopped: {err:#}");
        }
        self.shutdown();
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

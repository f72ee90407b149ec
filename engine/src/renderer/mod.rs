use anyhow::Result;
use glam::Vec4;

pub mod renderer_vulkan;

/// Per-frame parameters handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    clear_color: Vec4,
    delta_seconds: f64,
    frame_index: u64,
}

impl RenderFrame {
    pub fn new(clear_color: Vec4, delta_seconds: f64, frame_index: u64) -> Self {
        RenderFrame {
            clear_color,
            delta_seconds,
            frame_index,
        }
    }

    pub fn clear_color(&self) -> Vec4 {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = color;
    }

    pub fn delta_seconds(&self) -> f64 {
        self.delta_seconds
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

pub trait Renderer {
    /// Records and presents one frame.
    fn draw_frame(&mut self, frame: &RenderFrame) -> Result<()>;

    /// Called when the window's framebuffer size changes.
    fn resize(&mut self, width: u32, height: u32);
}

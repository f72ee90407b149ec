use glam::Vec4;
use tracing::Level;
use vulkano::format::Format;
use vulkano::swapchain::PresentMode;

/// Everything the engine needs to open its window and start rendering.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub window: WindowOptions,
    pub renderer: RendererOptions,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        WindowOptions {
            title: "New WGPU Window".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

/// Which kind of GPU to favour when several are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerPreference {
    #[default]
    HighPerformance,
    LowPower,
}

#[derive(Debug, Clone)]
pub struct RendererOptions {
    /// Colour the swapchain image is cleared to each frame, RGBA in 0..=1.
    pub clear_color: Vec4,
    /// Used when the surface offers it; otherwise the first offered format.
    pub preferred_format: Format,
    /// Falls back to FIFO, which every surface supports.
    pub present_mode: PresentMode,
    pub power_preference: PowerPreference,
    /// Enables the Khronos validation layer and routes its messages to the log.
    pub validation: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        RendererOptions {
            clear_color: Vec4::new(0.1, 0.9, 0.9, 1.0),
            preferred_format: Format::B8G8R8A8_UNORM,
            present_mode: PresentMode::Fifo,
            power_preference: PowerPreference::HighPerformance,
            validation: cfg!(debug_assertions),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub max_level: Level,
    pub pretty: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            max_level: Level::TRACE,
            pretty: true,
        }
    }
}

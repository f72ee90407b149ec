use native_engine::window::WindowState;
use native_engine::{EngineHandler, RenderFrame};
use tracing::info;

/// Averages frame times over one-second windows.
#[derive(Debug, Default)]
pub struct FrameStats {
    elapsed: f64,
    frames: u32,
}

impl FrameStats {
    /// Returns the frame rate each time a full second has been recorded.
    pub fn record(&mut self, delta_seconds: f64) -> Option<f64> {
        self.elapsed += delta_seconds;
        self.frames += 1;
        if self.elapsed < 1.0 {
            return None;
        }
        let fps = f64::from(self.frames) / self.elapsed;
        self.elapsed = 0.0;
        self.frames = 0;
        Some(fps)
    }
}

#[derive(Default)]
pub struct FirstApp {
    stats: FrameStats,
}

impl FirstApp {
    pub fn new() -> Self {
        FirstApp::default()
    }
}

impl EngineHandler for FirstApp {
    fn on_load(&mut self, window: &WindowState) {
        let (width, height) = window.size();
        info!("FirstApp loaded into a {width}x{height} window");
    }

    fn on_render(&mut self, frame: &mut RenderFrame) {
        if let Some(fps) = self.stats.record(frame.delta_seconds()) {
            info!("{fps:>5.1} FPS");
        }

        // Draw in here
    }

    fn on_shutdown(&mut self) {
        info!("FirstApp shutting down");
    }
}

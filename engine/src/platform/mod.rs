use anyhow::Result;

use crate::engine::Engine;

pub mod platform_winit;

/// Defines the contract for a platform layer.
/// Its only job is to take an engine and drive it.
pub trait Platform {
    /// Runs the engine until its window is closed, taking over the calling thread.
    fn run(&mut self, engine: &mut Engine) -> Result<()>;
}

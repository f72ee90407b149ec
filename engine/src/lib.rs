pub mod application;
pub mod config;
pub mod core;
pub mod engine;
pub mod entry_point;
pub mod logger;
pub mod platform;
pub mod renderer;
pub mod window;

pub use crate::application::Application;
pub use crate::config::EngineConfig;
pub use crate::core::linkage::{LINKAGE, Linkage};
pub use crate::engine::{Engine, EngineHandler};
pub use crate::renderer::RenderFrame;

use native_engine::{Application, Engine, EngineConfig};

use crate::first_app::FirstApp;

mod first_app;

fn create_application() -> Box<dyn Application> {
    Box::new(Engine::new(
        EngineConfig::default(),
        Box::new(FirstApp::new()),
    ))
}

native_engine::entry_point!(create_application);

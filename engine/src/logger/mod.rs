use tracing::debug;
use tracing_subscriber::FmtSubscriber;

use crate::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// Installs the global subscriber. Only the first call in a process wins;
    /// later calls leave the installed subscriber in place.
    pub fn new(config: &LoggingConfig) -> Self {
        let builder = FmtSubscriber::builder().with_max_level(config.max_level);
        let installed = if config.pretty {
            tracing::subscriber::set_global_default(builder.pretty().finish())
        } else {
            tracing::subscriber::set_global_default(builder.finish())
        };

        if installed.is_err() {
            debug!("global subscriber already set; keeping it");
        }

        Self
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(&LoggingConfig::default())
    }
}

use speedshift_core::{Config, SanitizedConfig, TranscodeRunner};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    runner: Arc<TranscodeRunner>,
}

impl AppState {
    pub fn new(config: Config, runner: Arc<TranscodeRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn runner(&self) -> &TranscodeRunner {
        self.runner.as_ref()
    }
}

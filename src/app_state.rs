//! Application state shared across all handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::database::MeasureStore;
use crate::services::MeasureService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Upload, confirmation and listing rules
    pub measure_service: MeasureService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn MeasureStore>) -> Self {
        Self {
            config,
            measure_service: MeasureService::new(store),
        }
    }
}

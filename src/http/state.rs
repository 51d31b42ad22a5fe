//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::settings::Settings;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Resolved service configuration
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state with the given repository and
    /// settings.
    pub fn new(repository: Arc<dyn FullRepository>, settings: Settings) -> Self {
        Self {
            repository,
            settings: Arc::new(settings),
        }
    }
}

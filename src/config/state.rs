// Application state module
// Shared, read-only state handed to every connection task

use super::types::Config;
use crate::catalog::ProductCatalog;

/// Application state
pub struct AppState {
    pub config: Config,
    pub catalog: ProductCatalog,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            catalog: ProductCatalog::new(config.catalog.file_path()),
        }
    }

    /// Whether the access log is enabled
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}

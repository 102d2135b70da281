//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::upload::UploadLimits;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    limits: UploadLimits,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Self {
        let limits = config.upload_limits();
        Self {
            inner: Arc::new(AppStateInner { config, limits }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the per-upload size limits
    pub fn upload_limits(&self) -> UploadLimits {
        self.inner.limits
    }
}

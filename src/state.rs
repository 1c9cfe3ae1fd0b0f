use std::sync::Arc;

use crate::config::AppConfig;
use crate::metrics::{self, Stats};

/// The shared application state.
///
/// Holds what the middleware stack reads at request time: the configuration and the
/// process-wide stats client. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// The statsd client, or a no-op stand-in when statsd is unavailable.
    pub stats: Stats,
}

impl AppState {
    pub fn new(config: AppConfig, stats: Stats) -> Self {
        Self { config: Arc::new(config), stats }
    }

    /// Builds the stats client from `config.statsd`, falling back to a no-op client.
    pub fn from_config(config: AppConfig) -> Self {
        let stats = metrics::from_config(&config.statsd);
        Self::new(config, stats)
    }
}

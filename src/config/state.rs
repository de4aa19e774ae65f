// Application state module
// Holds configuration and the finalized route table shared by all connections

use std::sync::Arc;

use super::types::Config;
use crate::host::RouteTable;

/// Application state
pub struct AppState {
    pub config: Config,
    pub routes: Arc<RouteTable>,
}

impl AppState {
    pub fn new(config: Config, routes: RouteTable) -> Self {
        Self {
            config,
            routes: Arc::new(routes),
        }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}

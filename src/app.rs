//! Host application startup
//!
//! Builds the route table in two phases: plugins first, then the host's own defaults.

use crate::config::{AppState, Config};
use crate::host::{defaults, RouteTable, Router, RouterError};
use crate::logger;
use crate::theme;

/// Run the plugin-loading phase, register host defaults and freeze the table
pub fn build_route_table(config: &Config) -> Result<RouteTable, RouterError> {
    let mut router = Router::new();

    if config.theme.enabled {
        let group = theme::load(&mut router, &config.theme.base_dir)?;
        logger::log_theme_loaded(&group);
    } else {
        logger::log_theme_disabled();
    }

    defaults::register(&mut router, &config.host)?;
    Ok(router.finalize())
}

/// Build the shared state served by every connection
pub fn build_state(config: Config) -> Result<AppState, RouterError> {
    let routes = build_route_table(&config)?;
    Ok(AppState::new(config, routes))
}

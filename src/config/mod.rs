// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HealthConfig, HostConfig, HttpConfig, LoggingConfig, PerformanceConfig,
    ServerConfig, ThemeConfig,
};

/// Environment variable prefix, e.g. `ARCADE_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "ARCADE";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; defaults apply first and `ARCADE_*` variables override both.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.backlog", 128)?
            .set_default("performance.shutdown_timeout", 10)?
            .set_default("http.server_name", "Arcade-Host/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("host.static_dir", "static")?
            .set_default("host.static_url_path", "/static")?
            .set_default("theme.enabled", true)?
            .set_default("theme.base_dir", "themes/arcade")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist/arcade-config").unwrap();
        assert_eq!(cfg.host.static_url_path, "/static");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.host.health.enabled);
        assert_eq!(cfg.host.health.liveness_path, "/healthz");
        assert_eq!(cfg.performance.backlog, 128);
        assert_eq!(cfg.performance.shutdown_timeout, 10);
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert!(cfg.server.workers.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("does-not-exist/arcade-config").unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 8123;
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8123);

        cfg.server.host = "not an address".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}

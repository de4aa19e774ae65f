// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub host: HostConfig,
    pub theme: ThemeConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common, json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
    /// Listen backlog
    pub backlog: i32,
    /// Seconds to wait for open connections to finish after a shutdown signal
    pub shutdown_timeout: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Host application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HostConfig {
    /// Directory backing the host's own static namespace
    pub static_dir: String,
    /// URL prefix of the host's own static namespace
    pub static_url_path: String,
    #[serde(default)]
    pub health: HealthConfig,
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Theme plugin configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ThemeConfig {
    /// Load the theme's route overlay at startup
    pub enabled: bool,
    /// Theme installation directory; its `static/` subdirectory holds the built app
    pub base_dir: String,
}

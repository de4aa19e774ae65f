//! Access log format module
//!
//! Supports:
//! - `combined` (Apache/Nginx combined format, the default)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)

use chrono::Local;
use serde_json::json;

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    pub status: u16,
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Endpoint of the route that served the request, if any
    pub endpoint: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            endpoint: None,
            request_time_us: 0,
        }
    }

    /// Format the log entry; unknown formats fall back to `combined`
    pub fn format(&self, format: &str) -> String {
        match format {
            "common" => self.format_common(),
            "json" => self.format_json(),
            _ => self.format_combined(),
        }
    }

    fn request_line(&self) -> String {
        format!(
            "{} {}{} HTTP/{}",
            self.method,
            self.path,
            self.query
                .as_ref()
                .map(|q| format!("?{q}"))
                .unwrap_or_default(),
            self.http_version,
        )
    }

    fn time_local(&self) -> String {
        self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string()
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent "$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time_local(),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "endpoint": self.endpoint,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }
}

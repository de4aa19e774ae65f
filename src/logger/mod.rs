//! Logger module
//!
//! Logging utilities for the host server:
//! - Server lifecycle and route table logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use crate::host::{RouteGroup, RouteTable};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Arcade host started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_theme_loaded(group: &RouteGroup) {
    write_info(&format!(
        "[Theme] Loaded '{}' with {} page routes",
        group.name(),
        group.len()
    ));
    if let (Some(url), Some(dir)) = (group.static_url_path(), group.static_dir()) {
        write_info(&format!("[Theme] Static assets: {url}/ -> {}", dir.display()));
    }
}

pub fn log_theme_disabled() {
    write_info("[Theme] Disabled by configuration, serving host pages");
}

/// Dump the finalized route table in resolution order
pub fn log_route_table(table: &RouteTable) {
    write_info(&format!("[Routes] {} routes registered:", table.len()));
    for entry in table.entries() {
        let methods: Vec<&str> = entry.methods.iter().map(hyper::Method::as_str).collect();
        write_info(&format!(
            "  {:<16} {:<40} {}",
            methods.join(","),
            entry.pattern.as_str(),
            entry.endpoint
        ));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        write_info(&format!("[Headers] Count: {count}"));
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_shutdown(reason: &str) {
    write_info(&format!("\n[Shutdown] {reason}, stopping accept loop"));
}

pub fn log_draining(open_connections: usize, timeout_secs: u64) {
    write_info(&format!(
        "[Shutdown] Waiting up to {timeout_secs}s for {open_connections} open connections"
    ));
}

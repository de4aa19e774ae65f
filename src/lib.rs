//! Arcade theme
//!
//! Route overlay that serves a pre-built single-page app's entry document for the
//! host's user-facing pages, together with the host routing surface it plugs into and
//! a small HTTP host to run it.

pub mod app;
pub mod config;
pub mod handler;
pub mod host;
pub mod http;
pub mod logger;
pub mod server;
pub mod theme;

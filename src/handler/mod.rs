//! Request handler module
//!
//! Dispatches requests through the finalized route table and serves static files.

pub mod dispatch;
pub mod static_files;

// Re-export main entry point
pub use dispatch::handle_request;

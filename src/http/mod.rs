//! HTTP protocol layer module
//!
//! Protocol-level helpers shared by every handler: content types, cache validation
//! and response builders.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_direct_response, build_file_response, build_options_response,
    build_redirect_response,
};

//! Host routing surface
//!
//! The parts of the host application a plugin interacts with:
//! - Path patterns with typed parameters
//! - Route groups with an isolated static namespace
//! - The mutable router used during startup and the frozen route table used per request
//! - The host's own default handlers

pub mod defaults;
pub mod group;
pub mod pattern;
pub mod route;
pub mod router;

pub use group::RouteGroup;
pub use pattern::{ParamValue, PathParams, PathPattern, PatternError};
pub use route::{RouteAction, RouteEntry};
pub use router::{Resolution, RouteTable, Router, RouterError};

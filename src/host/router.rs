//! Route registration and resolution
//!
//! [`Router`] is the mutable registration surface handed to plugins during startup.
//! [`Router::finalize`] freezes it into a [`RouteTable`], which is read-only and shared
//! across all connections. Resolution is first-registered-wins.

use super::group::RouteGroup;
use super::pattern::{PathParams, PathPattern, PatternError};
use super::route::{RouteAction, RouteEntry};
use hyper::Method;
use std::fmt;

/// Route registration error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    Pattern(PatternError),
    DuplicateGroup(String),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(e) => write!(f, "invalid route pattern: {e}"),
            Self::DuplicateGroup(name) => write!(f, "route group '{name}' is already registered"),
        }
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pattern(e) => Some(e),
            Self::DuplicateGroup(_) => None,
        }
    }
}

impl From<PatternError> for RouterError {
    fn from(e: PatternError) -> Self {
        Self::Pattern(e)
    }
}

/// Mutable route registration surface
#[derive(Debug, Default)]
pub struct Router {
    entries: Vec<RouteEntry>,
    groups: Vec<String>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single top-level route
    pub fn add_route(
        &mut self,
        pattern: &str,
        methods: &[Method],
        endpoint: &str,
        action: RouteAction,
    ) -> Result<(), RouterError> {
        self.entries.push(RouteEntry {
            endpoint: endpoint.to_string(),
            pattern: PathPattern::parse(pattern)?,
            methods: methods.to_vec(),
            action,
        });
        Ok(())
    }

    /// Attach every route of `group`, in order, after the routes already registered
    pub fn register_group(&mut self, group: &RouteGroup) -> Result<(), RouterError> {
        if self.groups.iter().any(|g| g == group.name()) {
            return Err(RouterError::DuplicateGroup(group.name().to_string()));
        }

        let routes = group.to_routes()?;
        self.entries.extend(routes.into_iter().map(|r| RouteEntry {
            endpoint: r.endpoint,
            pattern: r.pattern,
            methods: r.methods,
            action: r.action,
        }));
        self.groups.push(group.name().to_string());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the registrations
    pub fn finalize(self) -> RouteTable {
        RouteTable {
            entries: self.entries,
            groups: self.groups,
        }
    }
}

/// Result of resolving a request against the table
#[derive(Debug)]
pub enum Resolution<'a> {
    Matched {
        entry: &'a RouteEntry,
        params: PathParams,
    },
    MethodNotAllowed {
        allowed: Vec<Method>,
    },
    NotFound,
}

/// Immutable route table
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    groups: Vec<String>,
}

impl RouteTable {
    /// Find the first entry whose pattern and method both match.
    ///
    /// Entries that match the path but not the method are skipped, so a later
    /// registration for the same path with a different method still receives the request.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        let mut allowed: Vec<Method> = Vec::new();

        for entry in &self.entries {
            let Some(params) = entry.pattern.matches(path) else {
                continue;
            };
            if entry.allows(method) {
                return Resolution::Matched { entry, params };
            }
            for m in entry.advertised_methods() {
                if !allowed.contains(&m) {
                    allowed.push(m);
                }
            }
        }

        if allowed.is_empty() {
            Resolution::NotFound
        } else {
            Resolution::MethodNotAllowed { allowed }
        }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

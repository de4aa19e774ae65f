//! Route group module
//!
//! A named, isolated set of routes with its own static-file namespace.
//! Groups are built in full and then attached to a [`Router`](super::Router) in one step.

use super::pattern::{PathPattern, PatternError};
use super::route::RouteAction;
use hyper::Method;
use std::path::{Path, PathBuf};

/// Path parameter name used by group static routes
pub const STATIC_FILENAME_PARAM: &str = "filename";

#[derive(Debug, Clone)]
pub(super) struct GroupRoute {
    pub endpoint: String,
    pub pattern: PathPattern,
    pub methods: Vec<Method>,
    pub action: RouteAction,
}

/// Named route group
#[derive(Debug, Clone)]
pub struct RouteGroup {
    name: String,
    static_mount: Option<(String, PathBuf)>,
    routes: Vec<GroupRoute>,
}

impl RouteGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            static_mount: None,
            routes: Vec::new(),
        }
    }

    /// Serve files under `dir` at `url_path/...`
    #[must_use]
    pub fn with_static(mut self, url_path: &str, dir: impl Into<PathBuf>) -> Self {
        self.static_mount = Some((url_path.trim_end_matches('/').to_string(), dir.into()));
        self
    }

    /// Add a route; patterns are validated immediately
    pub fn route(
        &mut self,
        pattern: &str,
        methods: &[Method],
        endpoint: &str,
        action: RouteAction,
    ) -> Result<&mut Self, PatternError> {
        self.routes.push(GroupRoute {
            endpoint: format!("{}.{endpoint}", self.name),
            pattern: PathPattern::parse(pattern)?,
            methods: methods.to_vec(),
            action,
        });
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn static_url_path(&self) -> Option<&str> {
        self.static_mount.as_ref().map(|(url, _)| url.as_str())
    }

    pub fn static_dir(&self) -> Option<&Path> {
        self.static_mount.as_ref().map(|(_, dir)| dir.as_path())
    }

    /// Route patterns in registration order, static mount excluded
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes to install, static mount first
    pub(super) fn to_routes(&self) -> Result<Vec<GroupRoute>, PatternError> {
        let mut out = Vec::with_capacity(self.routes.len() + 1);
        if let Some((url, dir)) = &self.static_mount {
            out.push(GroupRoute {
                endpoint: format!("{}.static", self.name),
                pattern: PathPattern::parse(&format!("{url}/{{{STATIC_FILENAME_PARAM}:path}}"))?,
                methods: vec![Method::GET],
                action: RouteAction::Dir {
                    root: dir.clone(),
                    param: STATIC_FILENAME_PARAM.to_string(),
                },
            });
        }
        out.extend(self.routes.iter().cloned());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_namespaced() {
        let mut group = RouteGroup::new("arcade");
        group
            .route(
                "/login",
                &[Method::GET],
                "serve_app",
                RouteAction::File {
                    path: PathBuf::from("index.html"),
                },
            )
            .unwrap();
        let routes = group.to_routes().unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].endpoint, "arcade.serve_app");
    }

    #[test]
    fn test_static_mount_installed_first() {
        let mut group = RouteGroup::new("arcade").with_static("/themes/Arcade/static/", "/srv/static");
        group
            .route(
                "/",
                &[Method::GET],
                "serve_app",
                RouteAction::File {
                    path: PathBuf::from("index.html"),
                },
            )
            .unwrap();

        assert_eq!(group.static_url_path(), Some("/themes/Arcade/static"));
        assert_eq!(group.static_dir(), Some(Path::new("/srv/static")));
        assert_eq!(group.len(), 1);

        let routes = group.to_routes().unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].endpoint, "arcade.static");
        assert_eq!(
            routes[0].pattern.as_str(),
            "/themes/Arcade/static/{filename:path}"
        );
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let mut group = RouteGroup::new("g");
        let result = group.route(
            "no-slash",
            &[Method::GET],
            "x",
            RouteAction::Redirect {
                target: "/".to_string(),
                code: 302,
            },
        );
        assert!(result.is_err());
        assert!(group.is_empty());
    }
}

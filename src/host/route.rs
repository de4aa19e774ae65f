//! Route table entry types

use super::pattern::PathPattern;
use hyper::Method;
use std::path::PathBuf;

/// What to do when a route matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Serve one specific file, read fresh on every request
    File { path: PathBuf },
    /// Serve the file named by path parameter `param`, relative to `root`
    Dir { root: PathBuf, param: String },
    /// HTTP redirect
    Redirect { target: String, code: u16 },
    /// Fixed in-memory response
    Direct {
        status: u16,
        body: Option<String>,
        content_type: Option<String>,
    },
}

/// One registered route: pattern, allowed methods, handler reference
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub endpoint: String,
    pub pattern: PathPattern,
    pub methods: Vec<Method>,
    pub action: RouteAction,
}

impl RouteEntry {
    /// GET routes also answer HEAD
    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
            || (*method == Method::HEAD && self.methods.contains(&Method::GET))
    }

    /// Methods advertised in an `Allow` header for this entry
    pub fn advertised_methods(&self) -> Vec<Method> {
        let mut out = self.methods.clone();
        if out.contains(&Method::GET) && !out.contains(&Method::HEAD) {
            out.push(Method::HEAD);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(methods: &[Method]) -> RouteEntry {
        RouteEntry {
            endpoint: "test".to_string(),
            pattern: PathPattern::parse("/x").unwrap(),
            methods: methods.to_vec(),
            action: RouteAction::Direct {
                status: 200,
                body: None,
                content_type: None,
            },
        }
    }

    #[test]
    fn test_get_implies_head() {
        let e = entry(&[Method::GET]);
        assert!(e.allows(&Method::GET));
        assert!(e.allows(&Method::HEAD));
        assert!(!e.allows(&Method::POST));
        assert_eq!(e.advertised_methods(), vec![Method::GET, Method::HEAD]);
    }

    #[test]
    fn test_post_only() {
        let e = entry(&[Method::POST]);
        assert!(!e.allows(&Method::HEAD));
        assert_eq!(e.advertised_methods(), vec![Method::POST]);
    }
}

//! Host application default routes
//!
//! Stand-ins for the host's own server-rendered pages and form handlers. These are
//! registered after plugins have loaded, so any plugin route for the same path and
//! method takes precedence.

use super::router::{Router, RouterError};
use super::route::RouteAction;
use crate::config::HostConfig;
use crate::host::group::STATIC_FILENAME_PARAM;
use hyper::Method;
use std::path::PathBuf;

/// User-facing pages rendered by the host, as (pattern, title)
const HOST_PAGES: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/login", "Login"),
    ("/register", "Register"),
    ("/challenges", "Challenges"),
    ("/scoreboard", "Scoreboard"),
    ("/teams", "Teams"),
    ("/teams/{team_id:int}", "Team"),
    ("/users", "Users"),
    ("/users/{user_id:int}", "User"),
    ("/profile", "Profile"),
    ("/settings", "Settings"),
];

/// Register the host's default handlers on `router`
pub fn register(router: &mut Router, config: &HostConfig) -> Result<(), RouterError> {
    if config.health.enabled {
        let ok = RouteAction::Direct {
            status: 200,
            body: Some("ok".to_string()),
            content_type: Some("text/plain".to_string()),
        };
        router.add_route(
            &config.health.liveness_path,
            &[Method::GET],
            "health.liveness",
            ok.clone(),
        )?;
        router.add_route(
            &config.health.readiness_path,
            &[Method::GET],
            "health.readiness",
            ok,
        )?;
    }

    let static_url = config.static_url_path.trim_end_matches('/');
    router.add_route(
        &format!("{static_url}/{{{STATIC_FILENAME_PARAM}:path}}"),
        &[Method::GET],
        "static",
        RouteAction::Dir {
            root: PathBuf::from(&config.static_dir),
            param: STATIC_FILENAME_PARAM.to_string(),
        },
    )?;

    for (pattern, title) in HOST_PAGES {
        router.add_route(
            pattern,
            &[Method::GET],
            &format!("views.{}", title.to_lowercase()),
            RouteAction::Direct {
                status: 200,
                body: Some(render_page(title)),
                content_type: Some("text/html; charset=utf-8".to_string()),
            },
        )?;
    }

    for (pattern, endpoint) in [("/login", "auth.login"), ("/register", "auth.register")] {
        router.add_route(
            pattern,
            &[Method::POST],
            endpoint,
            RouteAction::Redirect {
                target: "/challenges".to_string(),
                code: 302,
            },
        )?;
    }

    router.add_route(
        "/logout",
        &[Method::GET],
        "auth.logout",
        RouteAction::Redirect {
            target: "/".to_string(),
            code: 302,
        },
    )?;

    Ok(())
}

fn render_page(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body><main data-host-view=\"{}\"><h1>{title}</h1></main></body>\n</html>\n",
        title.to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HealthConfig;
    use crate::host::router::Resolution;

    fn host_config() -> HostConfig {
        HostConfig {
            static_dir: "static".to_string(),
            static_url_path: "/static".to_string(),
            health: HealthConfig::default(),
        }
    }

    #[test]
    fn test_defaults_cover_user_pages() {
        let mut router = Router::new();
        register(&mut router, &host_config()).unwrap();
        let table = router.finalize();

        for path in ["/", "/login", "/teams/3", "/users/9", "/settings"] {
            match table.resolve(&Method::GET, path) {
                Resolution::Matched { entry, .. } => {
                    assert!(entry.endpoint.starts_with("views."), "{path}");
                }
                other => panic!("{path}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_login_post_redirects() {
        let mut router = Router::new();
        register(&mut router, &host_config()).unwrap();
        let table = router.finalize();

        match table.resolve(&Method::POST, "/login") {
            Resolution::Matched { entry, .. } => {
                assert_eq!(entry.endpoint, "auth.login");
                assert!(matches!(entry.action, RouteAction::Redirect { code: 302, .. }));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_health_disabled() {
        let mut config = host_config();
        config.health.enabled = false;
        let mut router = Router::new();
        register(&mut router, &config).unwrap();
        let table = router.finalize();
        assert!(matches!(
            table.resolve(&Method::GET, "/healthz"),
            Resolution::NotFound
        ));
    }

    #[test]
    fn test_render_page_title() {
        let html = render_page("Scoreboard");
        assert!(html.contains("<title>Scoreboard</title>"));
        assert!(html.contains("data-host-view=\"scoreboard\""));
    }
}

//! Arcade theme route overlay
//!
//! Replaces the host's server-rendered user pages with the pre-built single-page app.
//! [`load`] must run during the host's plugin-loading phase, before the host registers
//! its own default handlers: the route table resolves to the first registration that
//! matches both path and method, so the overlay's GET routes win and every other
//! method on the same paths falls through to the host.

use crate::host::{RouteAction, RouteGroup, Router, RouterError};
use hyper::Method;
use std::path::{Path, PathBuf};

/// Route group name; also the endpoint namespace (`arcade.serve_app`)
pub const THEME_NAME: &str = "arcade";

/// URL prefix for the bundled scripts, styles and images
pub const STATIC_URL_PATH: &str = "/themes/Arcade/static";

/// Subdirectory of the theme installation holding the built app
pub const STATIC_SUBDIR: &str = "static";

/// The app's entry document inside [`STATIC_SUBDIR`]
pub const ENTRY_DOCUMENT: &str = "index.html";

/// Endpoint bound to every overlay page route
pub const ENTRY_ENDPOINT: &str = "serve_app";

/// User-facing pages rendered by the client-side app
pub const OVERLAY_PATHS: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/challenges",
    "/scoreboard",
    "/teams",
    "/teams/{team_id:int}",
    "/users",
    "/users/{user_id:int}",
    "/profile",
    "/settings",
];

/// Absolute path of the static-assets directory for a theme installed at `base_dir`.
///
/// The directory is not required to exist.
pub fn static_dir_for(base_dir: &Path) -> PathBuf {
    std::path::absolute(base_dir)
        .unwrap_or_else(|_| base_dir.to_path_buf())
        .join(STATIC_SUBDIR)
}

/// Install the overlay on `router` and return the registered group.
///
/// Nothing on disk is checked here; a missing entry document surfaces as a 404 on the
/// first request that resolves to it. Fails only for a malformed pattern or when a group
/// named [`THEME_NAME`] is already registered.
pub fn load(router: &mut Router, base_dir: impl AsRef<Path>) -> Result<RouteGroup, RouterError> {
    let static_dir = static_dir_for(base_dir.as_ref());
    let entry_document = static_dir.join(ENTRY_DOCUMENT);

    let mut group = RouteGroup::new(THEME_NAME).with_static(STATIC_URL_PATH, &static_dir);
    for pattern in OVERLAY_PATHS {
        group.route(
            pattern,
            &[Method::GET],
            ENTRY_ENDPOINT,
            RouteAction::File {
                path: entry_document.clone(),
            },
        )?;
    }

    router.register_group(&group)?;
    Ok(group)
}

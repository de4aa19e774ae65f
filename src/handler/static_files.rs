//! Static file serving module
//!
//! Files are read from disk on every request; nothing is cached in memory, so a
//! rebuilt bundle is picked up without a restart.

use crate::handler::dispatch::RequestContext;
use crate::http::{self, cache, cache::CachePolicy, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Failure to produce a file for a request
#[derive(Debug)]
pub enum AssetError {
    /// Missing, outside the served root, or not a regular file
    NotFound,
    Io(io::Error),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("file not found"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound => None,
            Self::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for AssetError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(e)
        }
    }
}

/// Serve one file; used for the app entry document
pub async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
    match load_file(file_path).await {
        Ok((content, content_type)) => respond(ctx, content, content_type, CachePolicy::NoCache),
        Err(e) => error_response(&e, file_path),
    }
}

/// Serve `relative` from under `root`
pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    root: &Path,
    relative: &str,
) -> Response<Full<Bytes>> {
    let loaded = match resolve_in_directory(root, relative).await {
        Ok(path) => load_file(&path).await,
        Err(e) => Err(e),
    };

    match loaded {
        Ok((content, content_type)) => {
            respond(ctx, content, content_type, CachePolicy::default())
        }
        Err(e) => error_response(&e, &root.join(relative)),
    }
}

/// Read a regular file and detect its content type from the extension
pub async fn load_file(path: &Path) -> Result<(Vec<u8>, &'static str), AssetError> {
    if !fs::metadata(path).await?.is_file() {
        return Err(AssetError::NotFound);
    }
    let content = fs::read(path).await?;
    Ok((content, mime::content_type_for(path)))
}

/// Map a request-relative path to a regular file inside `root`
///
/// Rejects parent/absolute components, symlinks escaping the root and directories.
pub async fn resolve_in_directory(root: &Path, relative: &str) -> Result<PathBuf, AssetError> {
    let relative_path = Path::new(relative);
    if !relative_path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        logger::log_warning(&format!("Path traversal attempt blocked: {relative}"));
        return Err(AssetError::NotFound);
    }

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{}': {e}",
                root.display()
            ));
            return Err(AssetError::NotFound);
        }
    };

    let file_canonical = fs::canonicalize(root_canonical.join(relative_path)).await?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative} -> {}",
            file_canonical.display()
        ));
        return Err(AssetError::NotFound);
    }

    if !fs::metadata(&file_canonical).await?.is_file() {
        return Err(AssetError::NotFound);
    }

    Ok(file_canonical)
}

fn respond(
    ctx: &RequestContext<'_>,
    content: Vec<u8>,
    content_type: &str,
    policy: CachePolicy,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&content);
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag, policy);
    }
    http::build_file_response(Bytes::from(content), content_type, &etag, policy, ctx.is_head)
}

fn error_response(error: &AssetError, path: &Path) -> Response<Full<Bytes>> {
    match error {
        AssetError::NotFound => http::build_404_response(),
        AssetError::Io(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "arcade-static-{}-{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("root/assets")).unwrap();
        std::fs::write(dir.join("root/assets/app.css"), "body{}").unwrap();
        std::fs::write(dir.join("secret.txt"), "secret").unwrap();
        dir
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    #[tokio::test]
    async fn test_resolve_inside_root() {
        let dir = scratch_dir("inside");
        let path = resolve_in_directory(&dir.join("root"), "assets/app.css")
            .await
            .unwrap();
        assert!(path.ends_with("assets/app.css"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_parent_components_rejected() {
        let dir = scratch_dir("parent");
        let result = resolve_in_directory(&dir.join("root"), "../secret.txt").await;
        assert!(matches!(result, Err(AssetError::NotFound)));
        let result = resolve_in_directory(&dir.join("root"), "/etc/passwd").await;
        assert!(matches!(result, Err(AssetError::NotFound)));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_directory_not_listed() {
        let dir = scratch_dir("listing");
        let result = resolve_in_directory(&dir.join("root"), "assets").await;
        assert!(matches!(result, Err(AssetError::NotFound)));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_root_is_not_found() {
        let dir = scratch_dir("noroot");
        let result = resolve_in_directory(&dir.join("absent"), "app.css").await;
        assert!(matches!(result, Err(AssetError::NotFound)));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_serve_file_missing_is_404() {
        let dir = scratch_dir("missing");
        let resp = serve_file(&ctx("/"), &dir.join("root/index.html")).await;
        assert_eq!(resp.status(), 404);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_serve_file_directory_is_404() {
        let dir = scratch_dir("isdir");
        let resp = serve_file(&ctx("/"), &dir.join("root")).await;
        assert_eq!(resp.status(), 404);
        let result = load_file(&dir.join("root/assets")).await;
        assert!(matches!(result, Err(AssetError::NotFound)));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_read_failure_is_500() {
        let err = AssetError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let resp = error_response(&err, Path::new("/srv/theme/static/index.html"));
        assert_eq!(resp.status(), 500);
        assert_eq!(
            AssetError::from(io::Error::from(io::ErrorKind::NotFound)).to_string(),
            "file not found"
        );
    }

    #[tokio::test]
    async fn test_serve_directory_sets_type_and_etag() {
        let dir = scratch_dir("typed");
        let resp = serve_directory(&ctx("/x"), &dir.join("root"), "assets/app.css").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/css; charset=utf-8");
        assert_eq!(resp.headers()["Cache-Control"], "public, max-age=3600");

        let etag = resp.headers()["ETag"].to_str().unwrap().to_string();
        let conditional = RequestContext {
            path: "/x",
            is_head: false,
            if_none_match: Some(etag),
        };
        let resp = serve_directory(&conditional, &dir.join("root"), "assets/app.css").await;
        assert_eq!(resp.status(), 304);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

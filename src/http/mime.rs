//! MIME type detection module
//!
//! Returns the Content-Type for a file extension. Covers what a bundled single-page
//! app ships: documents, scripts, styles, source maps, images and fonts.

use std::path::Path;

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use arcade_theme::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(Some("js")), "text/javascript; charset=utf-8");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return "application/octet-stream";
    };

    match ext.to_ascii_lowercase().as_str() {
        // Documents
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "xml" => "application/xml",

        // Scripts and data
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Media
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",

        _ => "application/octet-stream",
    }
}

/// Content-Type for a path, from its extension
pub fn content_type_for(path: &Path) -> &'static str {
    get_content_type(path.extension().and_then(|e| e.to_str()))
}

//! HTTP response building module
//!
//! Builders for the status codes the server emits, decoupled from routing.

use super::cache::CachePolicy;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

/// Join methods into an `Allow` header value, adding OPTIONS
pub fn allow_header(allowed: &[Method]) -> String {
    let mut names: Vec<&str> = allowed.iter().map(Method::as_str).collect();
    if !allowed.contains(&Method::OPTIONS) {
        names.push(Method::OPTIONS.as_str());
    }
    names.join(", ")
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, policy: CachePolicy) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", policy.to_header_value())
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    plain_text(404, "404 Not Found")
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    plain_text(413, "413 Payload Too Large")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    plain_text(500, "500 Internal Server Error")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allowed: &[Method]) -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", allow_header(allowed))
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(allowed: &[Method], enable_cors: bool) -> Response<Full<Bytes>> {
    let allow = allow_header(allowed);
    let mut builder = Response::builder().status(204).header("Allow", &allow);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", &allow)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build redirect response with the given 3xx code
pub fn build_redirect_response(target: &str, code: u16) -> Response<Full<Bytes>> {
    Response::builder()
        .status(code)
        .header("Location", target)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Redirecting...")))
        .unwrap_or_else(|e| {
            log_build_error("redirect", &e);
            Response::new(Full::new(Bytes::from("Redirecting...")))
        })
}

/// Build a fixed response from route configuration
pub fn build_direct_response(
    status: u16,
    body: Option<&str>,
    content_type: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content = body.unwrap_or_default();
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::copy_from_slice(content.as_bytes())
    };

    Response::builder()
        .status(status)
        .header("Content-Type", content_type.unwrap_or("text/plain"))
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("direct", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 200 response for file content
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    policy: CachePolicy,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", policy.to_header_value())
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn plain_text(status: u16, text: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(text)))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(Full::new(Bytes::from(text)))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

//! Request dispatch module
//!
//! Entry point for HTTP request processing: body-size check, route resolution,
//! action dispatch and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::host::pattern::{self, PathParams};
use crate::host::{Resolution, RouteAction};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read; only the head matters for routing.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let access_entry = state
        .access_log_enabled()
        .then(|| new_access_entry(&req, peer_addr));

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let (mut response, endpoint) =
        if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
            (resp, None)
        } else {
            let ctx = RequestContext {
                path: &path,
                is_head: method == Method::HEAD,
                if_none_match: header_string(&req, &header::IF_NONE_MATCH),
            };
            route_request(&ctx, &method, &state).await
        };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(header::SERVER, server);
    }

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.endpoint = endpoint;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve against the route table and run the matched action
///
/// Returns the response and the endpoint that produced it, if a route matched.
async fn route_request(
    ctx: &RequestContext<'_>,
    method: &Method,
    state: &Arc<AppState>,
) -> (Response<Full<Bytes>>, Option<String>) {
    match state.routes.resolve(method, ctx.path) {
        Resolution::Matched { entry, params } => {
            let response = dispatch_action(ctx, &entry.action, &params).await;
            (response, Some(entry.endpoint.clone()))
        }
        Resolution::MethodNotAllowed { allowed } => {
            if *method == Method::OPTIONS {
                let cors = state.config.http.enable_cors;
                (http::build_options_response(&allowed, cors), None)
            } else {
                logger::log_warning(&format!("Method not allowed: {method} {}", ctx.path));
                (http::build_405_response(&allowed), None)
            }
        }
        Resolution::NotFound => (http::build_404_response(), None),
    }
}

/// Dispatch to specific route action
async fn dispatch_action(
    ctx: &RequestContext<'_>,
    action: &RouteAction,
    params: &PathParams,
) -> Response<Full<Bytes>> {
    match action {
        RouteAction::File { path } => static_files::serve_file(ctx, path).await,
        RouteAction::Dir { root, param } => match pattern::param(params, param) {
            Some(value) => static_files::serve_directory(ctx, root, &value.as_text()).await,
            None => {
                logger::log_error(&format!("Route has no '{param}' parameter for {}", ctx.path));
                http::build_404_response()
            }
        },
        RouteAction::Redirect { target, code } => http::build_redirect_response(target, *code),
        RouteAction::Direct {
            status,
            body,
            content_type,
        } => http::build_direct_response(
            *status,
            body.as_deref(),
            content_type.as_deref(),
            ctx.is_head,
        ),
    }
}

/// Return 413 if Content-Length exceeds the configured limit
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(header::CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn header_string<B>(req: &Request<B>, name: &header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn new_access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_string(req, &header::REFERER);
    entry.user_agent = header_string(req, &header::USER_AGENT);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_size_limit() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header("content-length", "2048")
            .body(())
            .unwrap();
        let resp = check_body_size(&req, 1024).unwrap();
        assert_eq!(resp.status(), 413);
        assert!(check_body_size(&req, 4096).is_none());
    }

    #[test]
    fn test_invalid_content_length_skipped() {
        let req = Request::builder()
            .uri("/")
            .header("content-length", "lots")
            .body(())
            .unwrap();
        assert!(check_body_size(&req, 1).is_none());
    }

    #[test]
    fn test_access_entry_from_request() {
        let req = Request::builder()
            .uri("/teams/42?tab=solves")
            .header("user-agent", "curl/8.0")
            .body(())
            .unwrap();
        let entry = new_access_entry(&req, "10.0.0.5:51000".parse().unwrap());
        assert_eq!(entry.remote_addr, "10.0.0.5");
        assert_eq!(entry.path, "/teams/42");
        assert_eq!(entry.query.as_deref(), Some("tab=solves"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.http_version, "1.1");
    }
}

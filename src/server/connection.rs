// Connection handling module
// Accepts a single TCP connection and serves it over HTTP/1

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection, enforcing the connection limit, and spawn its task.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `graceful` - Shutdown watcher the connection registers with
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    // Increment first, then check, so concurrent accepts cannot both pass the limit
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    if state.access_log_enabled() {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        graceful,
    );
}

/// Serve one connection in its own task.
///
/// Keep-alive follows `performance.keep_alive_timeout`; the whole connection is
/// bounded by the larger of the read and write timeouts. Once shutdown starts, the
/// in-flight response is finished and keep-alive is disabled.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    let io = TokioIo::new(stream);

    let keep_alive = state.config.performance.keep_alive_timeout > 0;
    let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
        state.config.performance.read_timeout,
        state.config.performance.write_timeout,
    ));

    let mut builder = http1::Builder::new();
    builder.keep_alive(keep_alive);

    let conn = graceful.watch(builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
    ));

    tokio::spawn(async move {
        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

// Server loop module
// Accepts connections until shutdown is signalled, then drains them

use hyper_util::server::graceful::GracefulShutdown;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop.
///
/// Once `shutdown` is notified the listener is closed and every open connection is
/// asked to finish its current response. Returns when they have all closed, or after
/// `performance.shutdown_timeout` seconds, whichever comes first.
pub async fn run(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections, &graceful);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);

    let open = active_connections.load(Ordering::SeqCst);
    let deadline = Duration::from_secs(state.config.performance.shutdown_timeout);
    logger::log_draining(open, deadline.as_secs());

    if tokio::time::timeout(deadline, graceful.shutdown()).await.is_err() {
        logger::log_warning(&format!(
            "Shutdown timeout reached with {} connections still open",
            active_connections.load(Ordering::SeqCst)
        ));
    }
}

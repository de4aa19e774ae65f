// Signal handling module
//
// - SIGTERM: graceful shutdown
// - SIGINT:  graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Spawn a task that notifies `shutdown` on SIGTERM or SIGINT
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    logger::log_error(&format!("Failed to register signal handlers: {e}"));
                    return;
                }
            };

        let reason = tokio::select! {
            _ = sigterm.recv() => "SIGTERM received",
            _ = sigint.recv() => "SIGINT received",
        };
        logger::log_shutdown(reason);
        shutdown.notify_one();
    });
}

/// Non-Unix fallback: only Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_shutdown("Ctrl+C received");
            shutdown.notify_one();
        }
    });
}

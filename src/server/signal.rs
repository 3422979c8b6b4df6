// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

/// Notify `shutdown` on the first termination signal (Unix)
#[cfg(unix)]
pub fn spawn_shutdown_listener(shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::error!("Failed to register signal handlers: {e}, falling back to Ctrl+C");
                    wait_for_ctrl_c(&shutdown).await;
                    return;
                }
            };

        tracing::info!("Signal handlers registered (SIGTERM, SIGINT), pid {}", std::process::id());

        tokio::select! {
            _ = sigterm.recv() => tracing::info!("SIGTERM received, initiating graceful shutdown"),
            _ = sigint.recv() => tracing::info!("SIGINT received, initiating graceful shutdown"),
        }
        shutdown.notify_one();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn spawn_shutdown_listener(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        wait_for_ctrl_c(&shutdown).await;
    });
}

async fn wait_for_ctrl_c(shutdown: &Notify) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Ctrl+C received, initiating graceful shutdown");
            shutdown.notify_one();
        }
        Err(e) => tracing::error!("Failed to listen for Ctrl+C: {e}"),
    }
}

// Server loop module
// Accepts connections until shutdown, then drains in-flight connections

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop on the current `LocalSet`.
///
/// Returns once `shutdown` is notified and active connections have finished,
/// or `performance.shutdown_grace` seconds have passed.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        tracing::error!("Failed to accept connection: {e}");
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    // Stop accepting before waiting on in-flight requests
    drop(listener);

    let grace = Duration::from_secs(state.config.performance.shutdown_grace);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));
    if drain_connections(&active_connections, grace).await {
        tracing::info!("All connections closed");
    } else {
        tracing::warn!(
            "Shutdown grace period of {}s elapsed with {} connection(s) still open",
            grace.as_secs(),
            active_connections.load(Ordering::SeqCst)
        );
    }

    Ok(())
}

/// Wait until the counter reaches zero or the deadline passes
///
/// Returns `true` if every connection finished in time.
pub async fn drain_connections(conn_counter: &AtomicUsize, grace: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        if conn_counter.load(Ordering::SeqCst) == 0 {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

//! Logger module
//!
//! Diagnostics go through `tracing`; access log lines are formatted by
//! [`AccessLogEntry`] and emitted on the `access` target.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::config::Config;
use writer::LogDestination;

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. Should be called once at
/// application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let destination = match config.logging.log_file.as_deref() {
        Some(path) => LogDestination::file(path)?,
        None => LogDestination::stdout(),
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(destination)
        .with_ansi(config.logging.log_file.is_none())
        .try_init()
        .map_err(std::io::Error::other)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Front door listening on http://{addr}");
    tracing::info!(
        root = %config.site.root,
        landing = %config.site.landing_document,
        app = %config.site.app_document,
        "Serving static site"
    );
    match config.routing.legacy_host.as_deref() {
        Some(legacy) if !legacy.trim().is_empty() => tracing::info!(
            "Redirecting {legacy} -> https://{}",
            config.routing.canonical_host
        ),
        _ => tracing::info!("Legacy host redirect disabled"),
    }
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(ref path) = config.logging.log_file {
        tracing::info!("Log file: {path}");
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::warn!("Failed to serve connection: {err:?}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_shutdown(active: usize) {
    tracing::info!("Shutting down, waiting for {active} active connection(s)");
}

use std::sync::Arc;

use mautoflow_edge::config::{self, AppState};
use mautoflow_edge::{logger, server};
use tokio::sync::Notify;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional positional argument: config file path without extension
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Worker thread count from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    let state = Arc::new(AppState::new(&cfg));
    if !state.site.root().is_dir() {
        tracing::warn!(
            "Site root '{}' is not a directory, every request will fall through to 404",
            state.site.root().display()
        );
    }
    logger::log_server_start(&addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::spawn_shutdown_listener(Arc::clone(&shutdown));

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local.run_until(server::serve(listener, state, shutdown)).await?;

    tracing::info!("Server stopped");
    Ok(())
}

//! Server startup: binding, idle sweeping and graceful shutdown.

use crate::{GameStore, ServerConfig, api};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Binds the configured address and serves until Ctrl-C.
///
/// # Errors
///
/// Returns the I/O error if the address cannot be bound or the server fails.
#[instrument(skip(config), fields(addr = %config.bind_addr()))]
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let store = Arc::new(GameStore::new(config.store().clone()));
    let sweeper = spawn_sweeper(Arc::clone(&store));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Server ready");

    let result = axum::serve(listener, api::router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    info!(?result, "Server exited");
    result
}

/// Starts a task that evicts idle games, if the store has an idle TTL.
#[instrument(skip(store))]
pub fn spawn_sweeper(store: Arc<GameStore>) -> Option<JoinHandle<()>> {
    let ttl = store.config().idle_ttl()?;
    let period = store.config().sweep_interval();
    info!(?ttl, ?period, "Starting idle game sweeper");

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let evicted = store.evict_idle(Instant::now());
            debug!(evicted, "Sweep finished");
        }
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

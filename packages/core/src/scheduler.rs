//! Log refresh scheduler.
//!
//! Drives the refresh loop: each tick reloads every entry from the log
//! source and swaps it into the shared store, so the API layer always
//! queries a recent snapshot without touching the filesystem per request.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::sync::RwLock;
use tokio::time;

use crate::logs::LogSource;
use crate::metrics::AppMetrics;
use crate::store::LogStore;

/// Run the log refresh loop.
///
/// Errors from the source are logged and the loop continues; the previous
/// snapshot stays in place until a refresh succeeds.
///
/// Runs until `Ctrl+C` (SIGINT) is received.
pub async fn run_log_refresh(
    source: Arc<dyn LogSource + Send + Sync>,
    store: Arc<RwLock<LogStore>>,
    metrics: Option<Arc<AppMetrics>>,
    refresh_interval_seconds: u64,
) {
    let mut interval = time::interval(Duration::from_secs(refresh_interval_seconds.max(1)));

    tracing::info!(
        "Log refresh started (source: {}, interval: {}s)",
        source.source_name(),
        refresh_interval_seconds
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                refresh_once(&source, &store, metrics.as_deref()).await;
            }

            _ = signal::ctrl_c() => {
                tracing::info!("Shutdown signal received. Stopping log refresh.");
                break;
            }
        }
    }

    tracing::info!("Log refresh stopped cleanly");
}

/// Execute a single refresh cycle.
///
/// Returns the number of entries now held by the store, or `None` when the
/// source failed and the store was left untouched.
pub async fn refresh_once(
    source: &Arc<dyn LogSource + Send + Sync>,
    store: &Arc<RwLock<LogStore>>,
    metrics: Option<&AppMetrics>,
) -> Option<usize> {
    if let Some(m) = metrics {
        m.log_refreshes_total.inc();
    }

    let entries = match source.load_entries().await {
        Ok(entries) => entries,
        Err(err) => {
            if let Some(m) = metrics {
                m.log_refresh_errors_total.inc();
            }
            tracing::error!("Log refresh error, keeping previous snapshot: {}", err);
            return None;
        }
    };

    if entries.is_empty() {
        tracing::warn!("Log source {} returned no entries", source.source_name());
    }

    let stored = {
        let mut store = store.write().await;
        store.replace(entries);
        store.len()
    };

    if let Some(m) = metrics {
        m.log_entries_stored.set(stored as f64);
    }
    tracing::debug!("Store now holds {} log entries", stored);

    Some(stored)
}

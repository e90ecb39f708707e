//! Watchdog subsystem: filesystem monitoring and debounced reloads.
//!
//! # Data Flow
//! ```text
//! OS file events (notify)
//!     → watcher.rs (filter to watched paths, bridge into a channel)
//!     → debounce.rs (coalesce bursts, one reload per window)
//!     → integrity checker over ALL specs (off the async threads)
//!     → StateStore::replace (accepted or rejected wholesale)
//! ```
//!
//! # Design Decisions
//! - Concurrent events for different paths merge into one checker pass over
//!   every spec, keeping the snapshot coherent
//! - A failed reload logs the report and leaves the store untouched; the
//!   loop survives indefinitely across failing edits
//! - Subscription failures retry quickly within a bounded budget, then mark
//!   the store stale and keep retrying on a slow cadence; a successful
//!   resubscribe clears the flag and forces one revalidation pass

pub mod debounce;
pub mod watcher;

pub use watcher::WatchMessage;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::RecommendedWatcher;
use tokio::sync::{broadcast, mpsc};

use crate::config::schema::{DocumentSpec, WatchdogConfig};
use crate::integrity::checker;
use crate::store::{StateStore, StoreError};

/// Long-running monitor over the declared document paths.
pub struct Watchdog {
    specs: Arc<Vec<DocumentSpec>>,
    store: Arc<StateStore>,
    config: WatchdogConfig,
}

impl Watchdog {
    pub fn new(
        specs: Arc<Vec<DocumentSpec>>,
        store: Arc<StateStore>,
        config: WatchdogConfig,
    ) -> Self {
        Self {
            specs,
            store,
            config,
        }
    }

    /// Run until the shutdown signal fires. Never exits on reload failure.
    pub async fn run(self, shutdown: broadcast::Receiver<()>) {
        let paths: Vec<PathBuf> = self.specs.iter().map(|s| s.path.clone()).collect();
        let window = Duration::from_millis(self.config.debounce_ms);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let supervisor = tokio::spawn(supervise_subscription(
            paths,
            self.config.clone(),
            self.store.clone(),
            event_tx,
        ));

        let specs = self.specs.clone();
        let store = self.store.clone();
        let reload = move |changed: Vec<PathBuf>| {
            let specs = specs.clone();
            let store = store.clone();
            async move {
                tracing::info!(changed = ?changed, "watched paths changed, revalidating");
                let outcome =
                    match tokio::task::spawn_blocking(move || checker::check(&specs)).await {
                        Ok(outcome) => outcome,
                        Err(error) => {
                            tracing::error!(%error, "validation task failed");
                            return;
                        }
                    };
                outcome.report.emit();
                match store.replace(outcome) {
                    Ok(snapshot) => {
                        tracing::info!(generation = snapshot.generation, "snapshot replaced");
                    }
                    Err(StoreError::RejectedReload(_)) => {
                        tracing::warn!("reload rejected, previous snapshot retained");
                    }
                }
            }
        };

        tracing::info!(
            documents = self.specs.len(),
            debounce_ms = self.config.debounce_ms,
            "watchdog started"
        );
        debounce::run(event_rx, window, shutdown, reload).await;
        supervisor.abort();
        tracing::info!("watchdog stopped");
    }
}

/// Owns the notify subscription: forwards change events into the debounce
/// loop and rebuilds the subscription when the event subsystem errors.
async fn supervise_subscription(
    paths: Vec<PathBuf>,
    config: WatchdogConfig,
    store: Arc<StateStore>,
    event_tx: mpsc::UnboundedSender<PathBuf>,
) {
    let (raw_tx, mut raw_rx) = mpsc::unbounded_channel::<WatchMessage>();
    let (mut subscription, failures) =
        subscribe_with_retry(&paths, &config, &store, &raw_tx).await;
    if failures > 0 {
        // Edits during the outage produced no events; force one
        // revalidation now that the watch is live.
        revalidate(&paths, &event_tx);
    }

    while let Some(message) = raw_rx.recv().await {
        match message {
            WatchMessage::Changed(path) => {
                if event_tx.send(path).is_err() {
                    break;
                }
            }
            WatchMessage::Error(error) => {
                tracing::warn!(%error, "filesystem watch error, resubscribing");
                drop(subscription);
                let (fresh, _) = subscribe_with_retry(&paths, &config, &store, &raw_tx).await;
                subscription = fresh;
                revalidate(&paths, &event_tx);
            }
        }
    }
    drop(subscription);
}

/// Nudge the debounce loop into one full checker pass over every spec.
fn revalidate(paths: &[PathBuf], event_tx: &mpsc::UnboundedSender<PathBuf>) {
    if let Some(path) = paths.first() {
        let _ = event_tx.send(path.clone());
    }
}

/// Subscribe, retrying on failure until a watcher is established. Within
/// the configured budget retries are quick; beyond it the snapshot is
/// marked stale and retries continue on a slow cadence, so recovery stays
/// reachable for as long as the process lives. A success clears the stale
/// flag. Returns the subscription and the number of failed attempts.
async fn subscribe_with_retry(
    paths: &[PathBuf],
    config: &WatchdogConfig,
    store: &StateStore,
    tx: &mpsc::UnboundedSender<WatchMessage>,
) -> (RecommendedWatcher, u32) {
    let mut attempt: u32 = 0;
    loop {
        match watcher::subscribe(paths, tx.clone()) {
            Ok(subscription) => {
                store.mark_stale(false);
                tracing::info!(paths = paths.len(), "watch subscription established");
                return (subscription, attempt);
            }
            Err(error) => {
                attempt = attempt.saturating_add(1);
                let exhausted = attempt >= config.resubscribe_attempts;
                if exhausted && !store.is_stale() {
                    tracing::error!(
                        %error,
                        attempts = attempt,
                        "watch subscription failed beyond retry budget, serving stale state until it heals"
                    );
                    store.mark_stale(true);
                } else if !exhausted {
                    tracing::warn!(%error, attempt, "watch subscription failed, retrying");
                }
                let delay = if exhausted {
                    Duration::from_millis(config.resubscribe_backoff_ms.saturating_mul(10))
                } else {
                    Duration::from_millis(config.resubscribe_backoff_ms)
                };
                tokio::time::sleep(delay).await;
            }
        }
    }
}

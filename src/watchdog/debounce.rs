//! Debounced reload loop.
//!
//! State machine over a channel of changed paths:
//!
//! ```text
//! Idle --event--> Pending(deadline) --timer fires--> Reloading --> Idle
//!         ^            |  ^
//!         |      event |  | (deadline pushed forward, paths coalesced)
//!         +------------+--+
//! ```
//!
//! Events arriving while a reload is in flight stay queued in the channel
//! and open a fresh debounce window once the reload completes, so a burst
//! of edits never produces more than one reload per window and a mid-reload
//! edit is never lost.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

/// Run the debounce loop until shutdown fires or the event channel closes.
///
/// `reload` receives the coalesced set of changed paths. Decoupled from the
/// filesystem entirely: events come in on a channel and the reload action is
/// injected, so the coalescing logic is testable without real file timing.
pub async fn run<F, Fut>(
    mut events: mpsc::UnboundedReceiver<PathBuf>,
    window: Duration,
    mut shutdown: broadcast::Receiver<()>,
    mut reload: F,
) where
    F: FnMut(Vec<PathBuf>) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut pending: Vec<PathBuf> = Vec::new();
    let mut deadline: Option<Instant> = None;

    loop {
        let timer = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            maybe_event = events.recv() => {
                match maybe_event {
                    Some(path) => {
                        if !pending.contains(&path) {
                            pending.push(path);
                        }
                        // A new event resets the timer rather than spawning
                        // a second reload.
                        deadline = Some(Instant::now() + window);
                    }
                    None => break,
                }
            }
            _ = timer => {
                let batch = std::mem::take(&mut pending);
                deadline = None;
                if !batch.is_empty() {
                    reload(batch).await;
                }
            }
            _ = shutdown.recv() => {
                // Shutdown cancels any pending but not-yet-fired timer.
                break;
            }
        }
    }
}

//! State store subsystem.
//!
//! # Data Flow
//! ```text
//! CheckOutcome (from the integrity checker)
//!     → replace(): reject if the report failed,
//!       otherwise build the next snapshot (generation + 1)
//!     → atomic swap of Arc<StateSnapshot>
//!     → readers observe the new snapshot on their next current()
//! ```
//!
//! # Design Decisions
//! - Readers are lock-free: current() is a single atomic load
//! - Writers serialize among themselves; the swap is all-or-nothing, so a
//!   reader never sees a snapshot mixing old and new documents
//! - A previously-valid snapshot is never overwritten by an invalid one:
//!   a failing outcome is rejected and the prior snapshot retained
//! - Staleness is a flag beside the snapshot, owned by the watchdog; it
//!   degrades readiness reporting without flipping readiness false

pub mod snapshot;

pub use snapshot::{StateDocument, StateSnapshot};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use arc_swap::ArcSwapOption;
use thiserror::Error;

use crate::integrity::checker::CheckOutcome;
use crate::integrity::report::ValidationReport;

/// Error type for snapshot replacement.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The outcome's report failed overall; the previous snapshot stands.
    #[error("reload rejected: validation failed")]
    RejectedReload(ValidationReport),
}

/// Holds the current validated snapshot; the single source of truth queried
/// by the API.
pub struct StateStore {
    current: ArcSwapOption<StateSnapshot>,
    writer: Mutex<()>,
    stale: AtomicBool,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::const_empty(),
            writer: Mutex::new(()),
            stale: AtomicBool::new(false),
        }
    }

    /// Atomically swap in a snapshot built from `outcome`.
    ///
    /// Rejected (previous snapshot retained) when the outcome's report
    /// failed overall. The generation counter increments exactly once per
    /// accepted replace.
    pub fn replace(&self, outcome: CheckOutcome) -> Result<Arc<StateSnapshot>, StoreError> {
        if !outcome.report.passed {
            return Err(StoreError::RejectedReload(outcome.report));
        }

        // Writers serialize here; readers never take this lock.
        let _guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let generation = self
            .current
            .load()
            .as_ref()
            .map(|snapshot| snapshot.generation)
            .unwrap_or(0)
            + 1;
        let snapshot = Arc::new(StateSnapshot {
            generation,
            loaded_at: SystemTime::now(),
            documents: outcome.documents,
            report: outcome.report,
        });
        self.current.store(Some(snapshot.clone()));
        Ok(snapshot)
    }

    /// Lock-free read of the latest snapshot. `None` until the first
    /// successful replace.
    pub fn current(&self) -> Option<Arc<StateSnapshot>> {
        self.current.load_full()
    }

    /// Generation of the current snapshot, 0 when uninitialized.
    pub fn generation(&self) -> u64 {
        self.current().map(|s| s.generation).unwrap_or(0)
    }

    /// Readiness: at least one successful validation pass has been swapped
    /// in. Failed outcomes are never stored, so presence implies validity.
    pub fn is_ready(&self) -> bool {
        self.current.load().is_some()
    }

    /// Mark the snapshot as stale (the watch subscription is down) or fresh.
    pub fn mark_stale(&self, stale: bool) {
        self.stale.store(stale, Ordering::SeqCst);
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

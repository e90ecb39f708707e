//! State API subsystem.
//!
//! # Responsibilities
//! - Expose the current snapshot (statuses, checksums, generation)
//! - Expose a readiness check (ready iff generation >= 1)
//! - Stay read-only: every request reads `StateStore::current()` and never
//!   touches the disk or triggers a reload

pub mod server;

pub use server::{build_router, StateApi};

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger the shutdown coordinator
//!
//! Shutdown (shutdown.rs):
//!     broadcast to all long-running tasks
//!     → API stops accepting, watchdog loop exits
//!     → orchestrator drains within the grace period
//! ```
//!
//! # Design Decisions
//! - One broadcast channel, subscribed by every long-running task
//! - A trigger before any subscriber is remembered, so early signals
//!   during startup are not lost

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;

//! Bootstrap & state-watch orchestrator.
//!
//! # Architecture Overview
//!
//! ```text
//!  defaults / file / env          declared document paths
//!          │                               │
//!          ▼                               ▼
//!   ┌──────────────┐              ┌─────────────────┐
//!   │    config    │─ specs ─────▶│    integrity    │◀─────────────┐
//!   └──────────────┘              │     checker     │              │
//!                                 └────────┬────────┘              │
//!                                          │ CheckOutcome         │ revalidate
//!                                          ▼                      │
//!                                 ┌─────────────────┐     ┌───────┴────────┐
//!                                 │   state store   │◀────│    watchdog    │◀── fs events
//!                                 │ (snapshot swap) │     │ (debounce loop)│
//!                                 └────────┬────────┘     └────────────────┘
//!                                          │ current()
//!                                          ▼
//!                                 ┌─────────────────┐
//!                                 │   state API     │──▶ /state, /ready
//!                                 └─────────────────┘
//! ```
//!
//! The orchestrator sequences the startup (config → initial validation →
//! store population → watchdog + API) and owns shutdown and exit codes.

// Core subsystems
pub mod config;
pub mod integrity;
pub mod store;
pub mod watchdog;

// Surfaces
pub mod api;
pub mod orchestrator;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::OrchestratorConfig;
pub use lifecycle::Shutdown;
pub use store::{StateSnapshot, StateStore};

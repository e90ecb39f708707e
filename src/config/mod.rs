//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (merge TOML override file, if declared)
//!     → loader.rs (apply STATEWATCH_* environment overrides)
//!     → validation.rs (semantic checks)
//!     → OrchestratorConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Precedence is strict: environment > file > defaults
//! - Config is built once per process start; changes require restart
//! - A missing override file is not an error; an unreadable present file is
//! - Unknown top-level keys are preserved verbatim, never interpreted
//! - Validation separates syntactic (serde) from semantic checks and
//!   returns all violations, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, process_env, ConfigError, ENV_PREFIX};
pub use schema::{
    DocumentSpec, LoggingConfig, OrchestratorConfig, ServerConfig, ShutdownConfig, WatchdogConfig,
};

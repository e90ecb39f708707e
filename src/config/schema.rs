//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! orchestrator. All types derive Serde traits for deserialization from the
//! TOML override file, and every section has defaults so a minimal (or empty)
//! config is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the orchestrator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// State API settings (bind address, request timeout).
    pub server: ServerConfig,

    /// Watchdog settings (debounce window, resubscribe budget).
    pub watchdog: WatchdogConfig,

    /// Shutdown settings (drain grace period).
    pub shutdown: ShutdownConfig,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Declared state documents, in validation-report order.
    pub documents: Vec<DocumentSpec>,

    /// Unknown top-level keys, carried along but never interpreted.
    #[serde(flatten)]
    pub extra: toml::value::Table,
}

/// State API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:7870").
    pub bind_address: String,

    /// Per-request timeout applied to every API handler.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:7870".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Watchdog configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Debounce window: filesystem events closer together than this are
    /// coalesced into one reload.
    pub debounce_ms: u64,

    /// How many times to retry the filesystem-event subscription before
    /// giving up and serving stale state.
    pub resubscribe_attempts: u32,

    /// Delay between subscription retries.
    pub resubscribe_backoff_ms: u64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 250,
            resubscribe_attempts: 5,
            resubscribe_backoff_ms: 500,
        }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long to wait for in-flight reloads and the API to drain before
    /// forcing exit.
    pub grace_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self { grace_secs: 5 }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// A declared state document to validate and watch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentSpec {
    /// Logical name, unique across the document list.
    pub name: String,

    /// Filesystem path of the document. The file is owned by the
    /// surrounding system; the orchestrator never creates it.
    pub path: PathBuf,

    /// Whether a failing document aborts startup. Optional documents only
    /// degrade the snapshot.
    #[serde(default)]
    pub required: bool,
}

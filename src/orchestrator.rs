//! Startup orchestration and process lifecycle.
//!
//! # Responsibilities
//! - Sequence config load → initial validation → store population →
//!   watchdog and API startup
//! - Own the process exit codes
//! - Drain long-running tasks within the shutdown grace period
//!
//! # Design Decisions
//! - Fail fast: config errors and failing required documents are the only
//!   fatal paths, and both happen before anything is spawned
//! - The API listener binds before tasks start, so a bind failure never
//!   leaves half the system running

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::api::StateApi;
use crate::config::{self, ConfigError, OrchestratorConfig};
use crate::integrity::checker;
use crate::integrity::report::ValidationReport;
use crate::lifecycle::{signals, Shutdown};
use crate::observability;
use crate::store::{StateStore, StoreError};
use crate::watchdog::Watchdog;

/// Exit code for a normal run or clean shutdown.
pub const EXIT_OK: u8 = 0;
/// Exit code when a required document fails initial validation.
pub const EXIT_VALIDATION: u8 = 1;
/// Exit code when configuration cannot be loaded.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code when the API listener cannot bind.
pub const EXIT_BIND: u8 = 3;

/// Fatal startup errors; everything after startup is non-fatal by design.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("required document validation failed\n{0}")]
    Validation(ValidationReport),

    #[error("failed to bind state API on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}

impl FatalError {
    pub fn exit_code(&self) -> u8 {
        match self {
            FatalError::Config(_) => EXIT_CONFIG,
            FatalError::Validation(_) => EXIT_VALIDATION,
            FatalError::Bind { .. } => EXIT_BIND,
        }
    }
}

/// Inputs to a run: the optional override file, the environment snapshot,
/// and flags.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub env: HashMap<String, String>,
    pub print_config: bool,
}

/// Run to completion, translating fatal errors into exit codes.
pub async fn run(opts: RunOptions) -> ExitCode {
    match try_run(opts).await {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(fatal) => {
            eprintln!("statewatch: {fatal}");
            tracing::error!(error = %fatal, exit_code = fatal.exit_code(), "fatal error");
            ExitCode::from(fatal.exit_code())
        }
    }
}

/// Like [`run`], with signal handling installed; shutdown comes from the OS.
pub async fn try_run(opts: RunOptions) -> Result<(), FatalError> {
    let shutdown = Arc::new(Shutdown::new());
    tokio::spawn(signals::listen(shutdown.clone()));
    try_run_with(opts, shutdown).await
}

/// Full startup sequence against an externally owned shutdown coordinator.
/// Returns after shutdown fires and the long-running tasks have drained (or
/// the grace period elapsed).
pub async fn try_run_with(opts: RunOptions, shutdown: Arc<Shutdown>) -> Result<(), FatalError> {
    let mut drained = shutdown.subscribe();

    let config = config::load(
        OrchestratorConfig::default(),
        opts.config_path.as_deref(),
        &opts.env,
    )?;
    observability::logging::init(&config.logging.level);

    if opts.print_config {
        let rendered = toml::to_string_pretty(&config).map_err(ConfigError::Encode)?;
        println!("{rendered}");
        return Ok(());
    }

    tracing::info!(
        bind_address = %config.server.bind_address,
        documents = config.documents.len(),
        debounce_ms = config.watchdog.debounce_ms,
        "configuration loaded"
    );
    if config.documents.is_empty() {
        tracing::warn!("no documents configured; serving an empty snapshot");
    }

    // Initial validation pass. The only fatal validation path in the whole
    // process lifetime.
    let specs = Arc::new(config.documents.clone());
    let store = Arc::new(StateStore::new());
    let outcome = checker::check(&specs);
    outcome.report.emit();
    if !outcome.report.passed {
        return Err(FatalError::Validation(outcome.report));
    }
    let snapshot = match store.replace(outcome) {
        Ok(snapshot) => snapshot,
        Err(StoreError::RejectedReload(report)) => return Err(FatalError::Validation(report)),
    };
    for document in snapshot.documents.values() {
        tracing::info!(
            document = %document.name,
            shape = %document.shape(),
            checksum = %document.checksum,
            "document loaded"
        );
    }
    tracing::info!(generation = snapshot.generation, "initial state populated");

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .map_err(|source| FatalError::Bind {
            addr: config.server.bind_address.clone(),
            source,
        })?;

    let watchdog = Watchdog::new(specs.clone(), store.clone(), config.watchdog.clone());
    let watchdog_task = tokio::spawn(watchdog.run(shutdown.subscribe()));

    let api = StateApi::new(config.server.clone(), store.clone());
    let api_task = tokio::spawn(api.run(listener, shutdown.subscribe()));
    tracing::info!(address = %config.server.bind_address, "state API serving");

    if !shutdown.is_triggered() {
        let _ = drained.recv().await;
    }
    tracing::info!("shutdown requested, draining tasks");

    let grace = Duration::from_secs(config.shutdown.grace_secs);
    let drain = async {
        if let Err(error) = watchdog_task.await {
            tracing::warn!(%error, "watchdog task aborted");
        }
        match api_task.await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => tracing::warn!(%error, "state API exited with error"),
            Err(error) => tracing::warn!(%error, "state API task aborted"),
        }
    };
    if tokio::time::timeout(grace, drain).await.is_err() {
        tracing::warn!(
            grace_secs = config.shutdown.grace_secs,
            "grace period elapsed before tasks drained, forcing exit"
        );
    }
    tracing::info!("shutdown complete");
    Ok(())
}

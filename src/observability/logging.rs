//! Structured logging initialization.
//!
//! RUST_LOG wins when set; otherwise the configured level applies to this
//! crate with tower_http kept quieter. Safe to call more than once (later
//! calls are no-ops), so embedding the orchestrator in tests is painless.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("statewatch={default_level},tower_http=warn")));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

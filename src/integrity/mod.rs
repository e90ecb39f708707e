//! Document integrity checking subsystem.
//!
//! # Data Flow
//! ```text
//! ordered document specs (from config)
//!     → checker.rs (read, parse, shape-check, checksum each path)
//!     → report.rs  (ValidationReport, one entry per spec, input order)
//!     → CheckOutcome { report, loaded documents }
//!     → StateStore (accepted or rejected wholesale)
//! ```
//!
//! # Design Decisions
//! - Report order mirrors spec order for reproducible logs and tests
//! - Overall pass/fail is driven by required documents only; a failing
//!   optional document is absent from the loaded set, others unaffected
//! - Checksums are SHA-256 over raw bytes, so byte-identical reloads are
//!   detectable across generations
//! - A report is immutable once produced; the next run supersedes it

pub mod checker;
pub mod report;

pub use checker::{check, checksum, CheckOutcome};
pub use report::{DocumentReport, DocumentStatus, ValidationReport};

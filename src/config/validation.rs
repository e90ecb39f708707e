//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the document list (names unique, paths non-empty)
//! - Validate value ranges (debounce > 0, bind address present)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: OrchestratorConfig → Result<(), Vec<ValidationIssue>>
//! - Runs after the merge, before the config is accepted into the system

use std::collections::BTreeSet;

use thiserror::Error;

use crate::config::schema::OrchestratorConfig;

/// A single semantic violation in the merged configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("server.bind_address must not be empty")]
    EmptyBindAddress,

    #[error("watchdog.debounce_ms must be greater than zero")]
    ZeroDebounce,

    #[error("document at index {0} has an empty name")]
    EmptyDocumentName(usize),

    #[error("duplicate document name '{0}'")]
    DuplicateDocumentName(String),

    #[error("document '{0}' has an empty path")]
    EmptyDocumentPath(String),
}

/// Check the merged configuration, collecting every violation.
pub fn validate_config(config: &OrchestratorConfig) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if config.server.bind_address.trim().is_empty() {
        issues.push(ValidationIssue::EmptyBindAddress);
    }
    if config.watchdog.debounce_ms == 0 {
        issues.push(ValidationIssue::ZeroDebounce);
    }

    let mut seen = BTreeSet::new();
    for (index, spec) in config.documents.iter().enumerate() {
        if spec.name.trim().is_empty() {
            issues.push(ValidationIssue::EmptyDocumentName(index));
            continue;
        }
        if !seen.insert(spec.name.clone()) {
            issues.push(ValidationIssue::DuplicateDocumentName(spec.name.clone()));
        }
        if spec.path.as_os_str().is_empty() {
            issues.push(ValidationIssue::EmptyDocumentPath(spec.name.clone()));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

//! Validation report types.

use std::fmt;

use serde::{Serialize, Serializer};

/// Validation status of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Present, parseable, and shape-valid.
    Valid,
    /// Not present on disk.
    Missing,
    /// Present but unreadable (permissions, path component not a
    /// directory, ...).
    Unreadable,
    /// Present but not parseable as structured data.
    InvalidParse,
    /// Parseable but the wrong top-level shape.
    InvalidSchema,
}

impl DocumentStatus {
    pub fn is_valid(self) -> bool {
        self == DocumentStatus::Valid
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentStatus::Valid => "valid",
            DocumentStatus::Missing => "missing",
            DocumentStatus::Unreadable => "invalid:read",
            DocumentStatus::InvalidParse => "invalid:parse",
            DocumentStatus::InvalidSchema => "invalid:schema",
        };
        f.write_str(label)
    }
}

impl Serialize for DocumentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-document entry in a [`ValidationReport`].
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    /// Logical document name.
    pub name: String,

    /// Source path, as declared in the document spec.
    pub path: String,

    /// Validation status.
    pub status: DocumentStatus,

    /// Whether this document was declared required.
    pub required: bool,

    /// Human-readable failure detail, when the status is not `valid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// SHA-256 checksum of the raw bytes, when the status is `valid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Outcome of one integrity-checker run over the declared document specs.
///
/// Immutable once produced; the next run supersedes it rather than mutating
/// it. Entry order mirrors the input spec order.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub entries: Vec<DocumentReport>,
    pub passed: bool,
}

impl ValidationReport {
    /// Look up the entry for a document by name.
    pub fn entry(&self, name: &str) -> Option<&DocumentReport> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Emit the report as structured log records, one event per document
    /// plus a summary. This is the canonical trace of validation activity.
    pub fn emit(&self) {
        for entry in &self.entries {
            if entry.status.is_valid() {
                tracing::info!(
                    document = %entry.name,
                    status = %entry.status,
                    checksum = entry.checksum.as_deref().unwrap_or(""),
                    "document validated"
                );
            } else {
                tracing::warn!(
                    document = %entry.name,
                    status = %entry.status,
                    required = entry.required,
                    detail = entry.detail.as_deref().unwrap_or(""),
                    "document validation failed"
                );
            }
        }
        if self.passed {
            tracing::info!(documents = self.entries.len(), "validation passed");
        } else {
            tracing::warn!(documents = self.entries.len(), "validation failed");
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "validation report: {}",
            if self.passed { "pass" } else { "fail" }
        )?;
        for entry in &self.entries {
            write!(f, "  {:<24} {}", entry.name, entry.status)?;
            if let Some(detail) = &entry.detail {
                write!(f, " ({detail})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

//! The integrity checker: existence, parse, shape, and checksum per document.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::time::SystemTime;

use sha2::{Digest, Sha256};

use crate::config::schema::DocumentSpec;
use crate::integrity::report::{DocumentReport, DocumentStatus, ValidationReport};
use crate::store::snapshot::StateDocument;

/// Result of one checker run: the report plus every successfully loaded
/// document, keyed by name. Failing optional documents are simply absent
/// from the map.
#[derive(Debug)]
pub struct CheckOutcome {
    pub report: ValidationReport,
    pub documents: BTreeMap<String, StateDocument>,
}

/// SHA-256 checksum of raw document bytes, as lowercase hex.
pub fn checksum(raw: &[u8]) -> String {
    hex::encode(Sha256::digest(raw))
}

/// Run the integrity check over the declared specs, in order.
///
/// Overall pass requires every *required* document to be valid. Optional
/// documents may be missing or malformed without failing the run; they are
/// reported and excluded from the loaded set.
pub fn check(specs: &[DocumentSpec]) -> CheckOutcome {
    let mut entries = Vec::with_capacity(specs.len());
    let mut documents = BTreeMap::new();
    let mut passed = true;

    for spec in specs {
        let (status, detail, document) = check_one(spec);
        if !status.is_valid() && spec.required {
            passed = false;
        }
        let checksum = document.as_ref().map(|d: &StateDocument| d.checksum.clone());
        entries.push(DocumentReport {
            name: spec.name.clone(),
            path: spec.path.display().to_string(),
            status,
            required: spec.required,
            detail,
            checksum,
        });
        if let Some(document) = document {
            documents.insert(spec.name.clone(), document);
        }
    }

    CheckOutcome {
        report: ValidationReport { entries, passed },
        documents,
    }
}

fn check_one(spec: &DocumentSpec) -> (DocumentStatus, Option<String>, Option<StateDocument>) {
    let raw = match std::fs::read(&spec.path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return (
                DocumentStatus::Missing,
                Some("file not found".to_string()),
                None,
            )
        }
        // Present-but-unreadable is not the same operator problem as absent.
        Err(e) => return (DocumentStatus::Unreadable, Some(e.to_string()), None),
    };

    let parsed: serde_json::Value = match serde_json::from_slice(&raw) {
        Ok(parsed) => parsed,
        Err(e) => return (DocumentStatus::InvalidParse, Some(e.to_string()), None),
    };

    // Deeper schema semantics belong to the document owners; here only the
    // top-level shape is enforced.
    if !(parsed.is_object() || parsed.is_array()) {
        return (
            DocumentStatus::InvalidSchema,
            Some("top-level value must be an object or array".to_string()),
            None,
        );
    }

    let checksum = checksum(&raw);
    let document = StateDocument {
        name: spec.name.clone(),
        path: spec.path.clone(),
        raw,
        parsed,
        checksum,
        loaded_at: SystemTime::now(),
    };
    (DocumentStatus::Valid, None, Some(document))
}

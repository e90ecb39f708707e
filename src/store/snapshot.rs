//! Snapshot types: immutable, versioned views of the loaded documents.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::integrity::report::ValidationReport;

/// One loaded state document. Replaced wholesale on every reload; never
/// mutated in place, so readers cannot observe a half-updated document.
#[derive(Debug, Clone)]
pub struct StateDocument {
    /// Logical name from the document spec.
    pub name: String,

    /// Source path on disk.
    pub path: PathBuf,

    /// Raw bytes as read from disk.
    pub raw: Vec<u8>,

    /// Parsed structured content.
    pub parsed: serde_json::Value,

    /// SHA-256 of `raw`, lowercase hex.
    pub checksum: String,

    /// When this document was loaded.
    pub loaded_at: SystemTime,
}

impl StateDocument {
    /// Small shape summary for startup logs, avoiding any content dump.
    pub fn shape(&self) -> String {
        match &self.parsed {
            serde_json::Value::Object(map) => format!("object({} keys)", map.len()),
            serde_json::Value::Array(items) => format!("array({} items)", items.len()),
            _ => "scalar".to_string(),
        }
    }
}

/// The store's current contents: documents by name plus the report that
/// admitted them and a monotonically increasing generation counter.
#[derive(Debug)]
pub struct StateSnapshot {
    /// Incremented exactly once per successful replace; 1 is the initial
    /// population.
    pub generation: u64,

    /// When this snapshot was swapped in.
    pub loaded_at: SystemTime,

    /// Successfully loaded documents, keyed by logical name.
    pub documents: BTreeMap<String, StateDocument>,

    /// The validation report this snapshot was built from.
    pub report: ValidationReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_summarizes_without_dumping_content() {
        let object = StateDocument {
            name: "persona".to_string(),
            path: PathBuf::from("/tmp/p.json"),
            raw: br#"{"a":1,"b":2}"#.to_vec(),
            parsed: serde_json::json!({"a":1,"b":2}),
            checksum: String::new(),
            loaded_at: SystemTime::now(),
        };
        assert_eq!(object.shape(), "object(2 keys)");

        let array = StateDocument {
            parsed: serde_json::json!([1, 2, 3]),
            ..object.clone()
        };
        assert_eq!(array.shape(), "array(3 items)");
    }
}

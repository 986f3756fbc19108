use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MALFORMED_STORAGE_ERROR: &str = "Malformed JSON from LocalStorage";

/// A recoverable failure captured during the session.
///
/// Object details are flattened next to `type`; any other detail lands under `data`.
/// A `type` key inside the detail replaces the given kind, so a record never carries two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ErrorLogEntry {
    pub fn new(kind: impl Into<String>, detail: Value) -> Self {
        let mut kind = kind.into();
        let details = match detail {
            Value::Object(mut map) => {
                match map.remove("type") {
                    Some(Value::String(detail_kind)) => kind = detail_kind,
                    Some(other) => kind = other.to_string(),
                    None => {}
                }
                map
            }
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };

        Self { kind, details }
    }
}

#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: Vec<ErrorLogEntry>,
}

impl ErrorLog {
    pub fn push(&mut self, kind: impl Into<String>, detail: Value) {
        let entry = ErrorLogEntry::new(kind, detail);
        log::warn!("recorded session error: {}", entry.kind);
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ErrorLogEntry] {
        &self.entries
    }

    pub(crate) fn take(&mut self) -> Vec<ErrorLogEntry> {
        std::mem::take(&mut self.entries)
    }
}

/// Record name for a flushed error log: ISO-8601 basic format, safe as a file name everywhere.
pub fn error_log_record_name(now: DateTime<Utc>) -> String {
    format!("{}.log", now.format("%Y%m%dT%H%M%S%.3fZ"))
}

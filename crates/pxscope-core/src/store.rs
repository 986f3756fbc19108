//! Durable key-value storage for client state plus the session error log.
//!
//! Every load is total: absent values yield the fallback, malformed values yield the
//! fallback and a diagnostic entry, and valid values are overlaid field by field.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Map, Value};

use crate::error_log::{error_log_record_name, ErrorLog, MALFORMED_STORAGE_ERROR};

pub const SETTINGS_KEY: &str = "settings";
pub const ACCOUNTS_KEY: &str = "accounts";
pub const AUTH_KEY: &str = "auth";

const STORAGE_READ_ERROR: &str = "Unreadable LocalStorage item";

pub trait StorageBackend {
    fn read_item(&self, key: &str) -> Result<Option<String>, String>;
    fn write_item(&mut self, key: &str, raw: &str) -> Result<(), String>;
    /// Writes a flushed error log and returns where it went.
    fn write_log_record(&mut self, name: &str, contents: &str) -> Result<String, String>;
}

/// Typed overlay of a parsed persisted value onto an in-memory default.
pub trait Overlay {
    fn overlay(&mut self, value: Value);
}

/// Replaces `slot` with `map[key]` when present and of the right shape.
pub fn overlay_field<T: DeserializeOwned>(slot: &mut T, map: &Map<String, Value>, key: &str) {
    let Some(raw) = map.get(key) else {
        return;
    };
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(value) => *slot = value,
        Err(error) => log::debug!("ignoring persisted field '{key}': {error}"),
    }
}

impl Overlay for Value {
    fn overlay(&mut self, value: Value) {
        if let (Value::Object(target), Value::Object(source)) = (self, value) {
            target.extend(source);
        }
    }
}

pub struct PersistentStore<B> {
    backend: B,
    errors: ErrorLog,
}

impl<B: StorageBackend> PersistentStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            errors: ErrorLog::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    pub fn load<T: Overlay>(&mut self, key: &str, mut fallback: T) -> T {
        if let Some(value) = self.read_value(key) {
            fallback.overlay(value);
        }
        fallback
    }

    /// Loads a value with no default to merge into; `None` when absent or malformed.
    pub fn load_raw(&mut self, key: &str) -> Option<Value> {
        self.read_value(key).filter(|value| !value.is_null())
    }

    fn read_value(&mut self, key: &str) -> Option<Value> {
        let raw = match self.backend.read_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                log::warn!("failed to read storage item '{key}': {error}");
                self.append_error(STORAGE_READ_ERROR, json!({ "key": key, "reason": error }));
                return None;
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                log::warn!("storage item '{key}' is malformed, using defaults: {error}");
                self.append_error(MALFORMED_STORAGE_ERROR, Value::String(raw));
                None
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), String> {
        let serialized = serde_json::to_string(value)
            .map_err(|error| format!("Failed to serialize storage item '{key}': {error}"))?;
        self.backend.write_item(key, &serialized)
    }

    pub fn append_error(&mut self, kind: &str, detail: Value) {
        self.errors.push(kind, detail);
    }

    /// Writes the error log as a single timestamped record if anything was recorded.
    pub fn flush(&mut self, now: DateTime<Utc>) -> Result<Option<String>, String> {
        if self.errors.is_empty() {
            return Ok(None);
        }

        let entries = self.errors.take();
        let contents = serde_json::to_string_pretty(&entries)
            .map_err(|error| format!("Failed to serialize error log: {error}"))?;
        let location = self
            .backend
            .write_log_record(&error_log_record_name(now), &contents)?;
        log::info!("flushed {} session error(s) to {location}", entries.len());
        Ok(Some(location))
    }
}

fn validate_key(key: &str) -> Result<(), String> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(format!("Invalid storage key '{key}'"))
    }
}

/// One JSON file per key under `<root>/storage`, error logs under `<root>/logs`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn item_path(&self, key: &str) -> PathBuf {
        self.root.join("storage").join(format!("{key}.json"))
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

fn write_file_creating_parent(path: &Path, contents: &str) -> Result<(), String> {
    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir).map_err(|error| {
            format!(
                "Failed to create directory {}: {}",
                parent_dir.display(),
                error
            )
        })?;
    }
    fs::write(path, contents)
        .map_err(|error| format!("Failed to write {}: {}", path.display(), error))
}

impl StorageBackend for FileStorage {
    fn read_item(&self, key: &str) -> Result<Option<String>, String> {
        validate_key(key)?;
        let path = self.item_path(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(format!("Failed to read {}: {}", path.display(), error)),
        }
    }

    fn write_item(&mut self, key: &str, raw: &str) -> Result<(), String> {
        validate_key(key)?;
        write_file_creating_parent(&self.item_path(key), raw)
    }

    fn write_log_record(&mut self, name: &str, contents: &str) -> Result<String, String> {
        let path = self.logs_dir().join(name);
        write_file_creating_parent(&path, contents)?;
        Ok(path.display().to_string())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    records: Vec<(String, String)>,
}

impl MemoryStorage {
    pub fn with_item(mut self, key: &str, raw: &str) -> Self {
        self.items.insert(key.to_string(), raw.to_string());
        self
    }

    pub fn item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn records(&self) -> &[(String, String)] {
        &self.records
    }
}

impl StorageBackend for MemoryStorage {
    fn read_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.items.get(key).cloned())
    }

    fn write_item(&mut self, key: &str, raw: &str) -> Result<(), String> {
        self.items.insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn write_log_record(&mut self, name: &str, contents: &str) -> Result<String, String> {
        self.records.push((name.to_string(), contents.to_string()));
        Ok(format!("memory:{name}"))
    }
}

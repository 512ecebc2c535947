//! Client-local persistence of completed rewrites.
//!
//! History lives entirely on the caller's machine: a single named collection
//! holding an ordered sequence of [`HistoryEntry`] records, most-recent-first.
//! The [`HistoryStore`] trait keeps the storage medium swappable; the default
//! [`JsonFileStore`] serializes the whole list to one JSON document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// An immutable record pairing an original prompt with its completed rewrite.
///
/// Entries are created only after a stream reaches natural completion; a
/// failed run never produces one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "raw")]
    pub raw_prompt: String,
    #[serde(rename = "enhanced")]
    pub enhanced_text: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Swappable persistence for the history list.
pub trait HistoryStore: Send {
    /// Load the stored list, most-recent-first.
    ///
    /// Missing or unreadable data loads as an empty list; only an
    /// inaccessible store is an error.
    fn load(&self) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Replace the stored list wholesale.
    fn save(&self, entries: &[HistoryEntry]) -> Result<(), StoreError>;
}

/// File-backed store holding the list as one JSON document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&text) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                log::warn!("discarding unreadable history at {:?}: {e}", self.path);
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        // Write-then-rename so a crash never leaves a torn document.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store used in tests and embedded callers.
///
/// Clones share the same underlying list, so a test can hand one clone to
/// the application and inspect the other.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<Vec<HistoryEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.entries.lock().unwrap().clone())
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        *self.entries.lock().unwrap() = entries.to_vec();
        Ok(())
    }
}

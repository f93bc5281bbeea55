//! Bounded list of recently viewed files
//!
//! Slot 0 is the file currently (or last) on screen. Browsing within a session
//! overwrites that slot; explicitly opening a file pushes a new one.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage::Storage;

/// Storage key of the serialized list
pub const RECENT_KEY: &str = "recent";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecentFile {
    pub id: String,
    pub parent_id: String,
    /// "{folder}/{file}" as shown in the title bar
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct RecentFiles {
    files: Vec<RecentFile>,
    capacity: usize,
    /// JSON last written to (or read from) storage
    persisted: Option<String>,
}

impl RecentFiles {
    pub fn new(capacity: usize) -> Self {
        Self {
            files: Vec::new(),
            capacity: capacity.max(1),
            persisted: None,
        }
    }

    /// Read the list saved under [`RECENT_KEY`]
    pub fn load(storage: &Storage, capacity: usize) -> Result<Self, StorageError> {
        let mut recent = Self::new(capacity);
        if let Some(json) = storage.get(RECENT_KEY)? {
            let mut files: Vec<RecentFile> = serde_json::from_str(&json)?;
            files.truncate(recent.capacity);
            recent.files = files;
            recent.persisted = Some(json);
        }
        Ok(recent)
    }

    pub fn files(&self) -> &[RecentFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Overwrite the most recent slot
    pub fn replace(&mut self, file: RecentFile) {
        if self.files.is_empty() {
            self.files.push(file);
        } else {
            self.files[0] = file;
        }
    }

    /// Push a new most recent slot, evicting the oldest beyond capacity
    pub fn shift(&mut self, file: RecentFile) {
        self.files.insert(0, file);
        self.files.truncate(self.capacity);
    }

    pub fn remove(&mut self, id: &str) {
        self.files.retain(|f| f.id != id);
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Write the list back; returns whether storage was touched
    ///
    /// Nothing is written when the serialized list did not change. An empty
    /// list removes the key.
    pub fn persist(&mut self, storage: &Storage) -> Result<bool, StorageError> {
        if self.files.is_empty() {
            let removed = storage.remove(RECENT_KEY)?;
            self.persisted = None;
            return Ok(removed);
        }

        let json = serde_json::to_string(&self.files)?;
        if self.persisted.as_deref() == Some(json.as_str()) {
            return Ok(false);
        }
        storage.set(RECENT_KEY, &json)?;
        self.persisted = Some(json);
        Ok(true)
    }
}

//! In-process blob store

use super::BlobStore;
use crate::error::{Result, StudyBuddyError};
use std::collections::HashMap;
use std::sync::RwLock;

/// Blob store held in memory, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StudyBuddyError::Storage("Failed to acquire read lock".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StudyBuddyError::Storage("Failed to acquire write lock".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn write_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut entries_guard = self
            .entries
            .write()
            .map_err(|_| StudyBuddyError::Storage("Failed to acquire write lock".to_string()))?;
        for (key, value) in entries {
            entries_guard.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StudyBuddyError::Storage("Failed to acquire write lock".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

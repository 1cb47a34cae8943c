//! Sled-backed blob store

use super::BlobStore;
use crate::error::{Result, StudyBuddyError};
use sled::Db;
use std::path::Path;

/// Blob store persisted in an embedded `sled` database
pub struct SledBlobStore {
    db: Db,
}

impl SledBlobStore {
    /// Open or create the database at `path`
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::Storage` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```
    /// use studybuddy::storage::{BlobStore, SledBlobStore};
    ///
    /// # fn main() -> studybuddy::error::Result<()> {
    /// let dir = tempfile::TempDir::new()?;
    /// let store = SledBlobStore::open(dir.path().join("store"))?;
    /// store.write("greeting", "hello")?;
    /// assert_eq!(store.read("greeting")?, Some("hello".to_string()));
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| StudyBuddyError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }
}

impl BlobStore for SledBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| StudyBuddyError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let text = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    StudyBuddyError::Parse(format!("Value under {} is not UTF-8: {}", key, e))
                })?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| StudyBuddyError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| StudyBuddyError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn write_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut batch = sled::Batch::default();
        for (key, value) in entries {
            batch.insert(key.as_bytes(), value.as_bytes());
        }
        self.db
            .apply_batch(batch)
            .map_err(|e| StudyBuddyError::Storage(format!("Batch insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| StudyBuddyError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| StudyBuddyError::Storage(format!("Remove failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| StudyBuddyError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}

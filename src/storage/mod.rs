//! Persistence adapter for chat and folder lists
//!
//! The two lists are stored as JSON text under fixed keys in a durable
//! key-value store. The adapter only serializes and deserializes; it does not
//! validate records or reconcile ids.

use crate::error::{Result, StudyBuddyError};
use crate::models::{ChatSession, Folder};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

pub mod memory;
pub mod sled_store;

pub use memory::MemoryBlobStore;
pub use sled_store::SledBlobStore;

/// Key holding the JSON array of chat sessions
pub const CHATS_KEY: &str = "studybuddy_chats";

/// Key holding the JSON array of folders
pub const FOLDERS_KEY: &str = "studybuddy_folders";

/// Durable string key-value store
pub trait BlobStore: Send + Sync {
    /// Read the value stored under `key`, `None` if absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key succeeds
    fn remove(&self, key: &str) -> Result<()>;

    /// Store several key-value pairs as one unit
    ///
    /// Stores that can apply the pairs atomically override this; the default
    /// writes them one at a time.
    fn write_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.write(key, value)?;
        }
        Ok(())
    }
}

/// Reads and writes the chat and folder lists
pub struct Storage {
    blobs: Box<dyn BlobStore>,
}

impl Storage {
    /// Wrap a blob store
    pub fn new(blobs: Box<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Storage backed by a sled database in `data_dir`
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::Storage` if the database cannot be opened
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let path = data_dir.into().join("store");
        Ok(Self::new(Box::new(SledBlobStore::open(path)?)))
    }

    /// Storage that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBlobStore::new()))
    }

    /// Load the persisted chat list; a missing key yields an empty list
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::Parse` if the stored value is not a JSON
    /// array of chat sessions
    pub fn load_chats(&self) -> Result<Vec<ChatSession>> {
        self.load_list(CHATS_KEY)
    }

    /// Load the persisted folder list; a missing key yields an empty list
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::Parse` if the stored value is not a JSON
    /// array of folders
    pub fn load_folders(&self) -> Result<Vec<Folder>> {
        self.load_list(FOLDERS_KEY)
    }

    /// Write both lists in full
    ///
    /// Both lists are serialized before anything is written, and the two
    /// values are stored in a single batch so a failure leaves neither key
    /// half-updated.
    pub fn flush(&self, chats: &[ChatSession], folders: &[Folder]) -> Result<()> {
        let chats_json = serde_json::to_string(chats)?;
        let folders_json = serde_json::to_string(folders)?;
        self.blobs.write_all(&[
            (CHATS_KEY, chats_json.as_str()),
            (FOLDERS_KEY, folders_json.as_str()),
        ])?;
        tracing::debug!(
            chats = chats.len(),
            folders = folders.len(),
            "Flushed chat history"
        );
        Ok(())
    }

    /// Remove both keys
    pub fn clear(&self) -> Result<()> {
        self.blobs.remove(CHATS_KEY)?;
        self.blobs.remove(FOLDERS_KEY)?;
        Ok(())
    }

    fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.blobs.read(key)? {
            Some(text) => serde_json::from_str(&text).map_err(|e| {
                StudyBuddyError::Parse(format!("Malformed value under {}: {}", key, e)).into()
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Platform data directory for StudyBuddy
///
/// # Errors
///
/// Returns `StudyBuddyError::Storage` if no home directory can be determined
pub fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "studybuddy", "studybuddy")
        .ok_or_else(|| StudyBuddyError::Storage("Could not determine data directory".into()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

//! Folder store
//!
//! Folders group chats by id. They never own chats: deleting a folder leaves
//! its chats alone, and deleting a chat leaves its id in every folder.

use crate::error::{Result, StudyBuddyError};
use crate::models::{mint_id, raise_id_floor, ChatId, Folder, FolderColor, FolderId};

/// Ordered list of folders
#[derive(Debug, Clone, Default)]
pub struct FolderStore {
    folders: Vec<Folder>,
    last_id: FolderId,
}

impl FolderStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding previously persisted folders
    pub fn from_folders(folders: Vec<Folder>) -> Self {
        let mut store = Self::new();
        store.extend(folders);
        store
    }

    /// All folders in creation order
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Number of folders
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Whether there are no folders
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Folder at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Folder> {
        self.folders.get(index)
    }

    /// Index of the first folder named `name`, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.folders
            .iter()
            .position(|f| f.name.to_lowercase() == wanted)
    }

    /// Create a folder at the end of the list
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::InvalidInput` if the trimmed name is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use studybuddy::folders::FolderStore;
    /// use studybuddy::models::FolderColor;
    ///
    /// let mut store = FolderStore::new();
    /// let folder = store.create(" Math ", FolderColor::Green).unwrap();
    /// assert_eq!(folder.name, "Math");
    /// assert!(folder.chats.is_empty());
    /// assert!(store.create("   ", FolderColor::Blue).is_err());
    /// ```
    pub fn create(&mut self, name: &str, color: FolderColor) -> Result<&Folder> {
        let name = validate_name(name)?;
        let id = mint_id(&mut self.last_id);
        self.folders.push(Folder {
            id,
            name,
            color,
            chats: Vec::new(),
        });
        tracing::debug!(folder_id = id, "Created folder");
        Ok(&self.folders[self.folders.len() - 1])
    }

    /// Rename the folder at `index`
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::InvalidInput` if the trimmed name is empty,
    /// or `StudyBuddyError::NotFound` if `index` is out of range
    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<()> {
        let name = validate_name(new_name)?;
        self.folder_mut(index)?.name = name;
        Ok(())
    }

    /// Remove the folder at `index` and return it
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::NotFound` if `index` is out of range
    pub fn delete(&mut self, index: usize) -> Result<Folder> {
        self.folder_mut(index)?;
        let removed = self.folders.remove(index);
        tracing::debug!(folder_id = removed.id, "Deleted folder");
        Ok(removed)
    }

    /// Add `chat_id` to the folder at `index`
    ///
    /// Returns `true` if the id was added and `false` if it was already a
    /// member.
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::NotFound` if `index` is out of range
    pub fn add_chat_id(&mut self, index: usize, chat_id: ChatId) -> Result<bool> {
        let folder = self.folder_mut(index)?;
        if folder.chats.contains(&chat_id) {
            return Ok(false);
        }
        folder.chats.push(chat_id);
        Ok(true)
    }

    /// Chat ids in the folder at `index`
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::NotFound` if `index` is out of range
    pub fn members_of(&self, index: usize) -> Result<&[ChatId]> {
        self.folders
            .get(index)
            .map(|f| f.chats.as_slice())
            .ok_or_else(|| not_found(index, self.folders.len()).into())
    }

    /// Append folders without de-duplication
    pub fn extend(&mut self, folders: Vec<Folder>) {
        for f in &folders {
            raise_id_floor(&mut self.last_id, f.id);
        }
        self.folders.extend(folders);
    }

    /// Remove every folder
    pub fn clear(&mut self) {
        self.folders.clear();
    }

    fn folder_mut(&mut self, index: usize) -> Result<&mut Folder> {
        let len = self.folders.len();
        self.folders
            .get_mut(index)
            .ok_or_else(|| not_found(index, len).into())
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StudyBuddyError::InvalidInput("Please enter a folder name".to_string()).into());
    }
    Ok(name.to_string())
}

fn not_found(index: usize, len: usize) -> StudyBuddyError {
    StudyBuddyError::NotFound(format!("folder {} (have {})", index + 1, len))
}

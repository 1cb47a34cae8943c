//! Orchestrator
//!
//! `App` ties the application state to persistence and the reply gateway.
//! Every successful mutation is followed by a full flush of both lists, so a
//! front end only has to call the operation and then re-render from the
//! projections.

use crate::config::{ChatConfig, Config};
use crate::error::{kind_of, Result, StudyBuddyError};
use crate::gateway::{HttpReplyGateway, ReplyGateway};
use crate::models::{now_millis, ChatSession, Folder, FolderColor};
use crate::render::{self, ChatListItem, FolderListItem};
use crate::state::{AppState, DeliveredReply};
use crate::storage::Storage;
use crate::transfer::{self, ImportSummary};
use std::path::{Path, PathBuf};

/// Chat application backed by persistent storage
pub struct App {
    state: AppState,
    storage: Storage,
    gateway: Box<dyn ReplyGateway>,
}

impl App {
    /// Open the configured data directory and HTTP gateway
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or the HTTP client
    /// cannot be built
    pub fn open(config: &Config) -> Result<Self> {
        let data_dir = config.data_dir()?;
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Using data directory {}", data_dir.display());

        let storage = Storage::open(&data_dir)?;
        let gateway = HttpReplyGateway::new(&config.gateway)?;
        Self::with_parts(storage, Box::new(gateway), &config.chat)
    }

    /// Build an app from explicit parts and load persisted lists
    ///
    /// A list whose stored value is malformed loads as empty with a warning.
    ///
    /// # Errors
    ///
    /// Returns error if the storage backend itself fails
    pub fn with_parts(
        storage: Storage,
        gateway: Box<dyn ReplyGateway>,
        chat: &ChatConfig,
    ) -> Result<Self> {
        let chats = load_or_empty(storage.load_chats(), "chat list")?;
        let folders = load_or_empty(storage.load_folders(), "folder list")?;
        tracing::info!(
            chats = chats.len(),
            folders = folders.len(),
            "Loaded chat history"
        );

        let state = AppState::from_lists(
            chats,
            folders,
            chat.text_limits(),
            chat.fallback_message.clone(),
        );
        Ok(Self {
            state,
            storage,
            gateway,
        })
    }

    /// Current state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Underlying storage
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Write both lists to storage
    pub fn flush(&self) -> Result<()> {
        self.storage.flush(
            self.state.chats.sessions(),
            self.state.folders.folders(),
        )
    }

    /// Send a message in the active chat (or a new one) and record the reply
    ///
    /// The user message is persisted before the gateway is called. A gateway
    /// failure is not an error: the fallback message is recorded instead and
    /// `DeliveredReply::fell_back` is set.
    ///
    /// # Errors
    ///
    /// If the user message cannot be persisted the send is undone and the
    /// gateway is never called. If the reply cannot be persisted the chat is
    /// already idle with the reply in memory, and the next successful flush
    /// writes it.
    pub async fn send_message(&mut self, text: &str) -> Result<Option<DeliveredReply>> {
        let pending = self.state.begin_send(text)?;
        if let Err(e) = self.flush() {
            tracing::warn!(chat_id = pending.chat_id, "Could not save message: {}", e);
            self.state.abort_send(&pending)?;
            return Err(e);
        }

        let outcome = self.gateway.send(&pending.message).await;
        let chat_id = pending.chat_id;
        let delivered = self.state.complete_send(pending, outcome)?;
        if let Err(e) = self.flush() {
            tracing::warn!(chat_id, "Could not save reply: {}", e);
            return Err(e);
        }
        Ok(delivered)
    }

    /// Make the chat at `index` active
    pub fn select_chat(&mut self, index: usize) -> Result<&ChatSession> {
        self.state.chats.select(index)
    }

    /// Drop the selection so the next message starts a new chat
    pub fn new_chat(&mut self) {
        self.state.chats.clear_selection();
    }

    /// Rename the chat at `index`
    pub fn rename_chat(&mut self, index: usize, title: &str) -> Result<()> {
        self.state.chats.rename(index, title)?;
        self.flush()
    }

    /// Delete the chat at `index`; folder references to it are kept
    pub fn delete_chat(&mut self, index: usize) -> Result<ChatSession> {
        let removed = self.state.chats.delete(index)?;
        self.flush()?;
        Ok(removed)
    }

    /// Create a folder
    pub fn create_folder(&mut self, name: &str, color: FolderColor) -> Result<Folder> {
        let folder = self.state.folders.create(name, color)?.clone();
        self.flush()?;
        Ok(folder)
    }

    /// Rename the folder at `index`
    pub fn rename_folder(&mut self, index: usize, name: &str) -> Result<()> {
        self.state.folders.rename(index, name)?;
        self.flush()
    }

    /// Delete the folder at `index`; its chats are untouched
    pub fn delete_folder(&mut self, index: usize) -> Result<Folder> {
        let removed = self.state.folders.delete(index)?;
        self.flush()?;
        Ok(removed)
    }

    /// Add the chat at `chat_index` to the folder at `folder_index`
    ///
    /// Returns whether the chat was newly added.
    pub fn add_chat_to_folder(&mut self, folder_index: usize, chat_index: usize) -> Result<bool> {
        let chat_id = self
            .state
            .chats
            .get(chat_index)
            .map(|s| s.id)
            .ok_or_else(|| StudyBuddyError::NotFound(format!("chat {}", chat_index + 1)))?;
        let added = self.state.folders.add_chat_id(folder_index, chat_id)?;
        if added {
            self.flush()?;
        }
        Ok(added)
    }

    /// Add the active chat to the folder at `folder_index`
    pub fn move_active_to_folder(&mut self, folder_index: usize) -> Result<bool> {
        let added = self.state.move_active_to_folder(folder_index)?;
        if added {
            self.flush()?;
        }
        Ok(added)
    }

    /// Export document for every chat and folder
    pub fn export_all(&self) -> Result<String> {
        transfer::export_all(&self.state.chats, &self.state.folders, chrono::Utc::now())
    }

    /// Export document for the chat at `index`
    pub fn export_chat(&self, index: usize) -> Result<String> {
        self.state.chats.export_one(index)
    }

    /// Export document for the active chat
    pub fn export_active(&self) -> Result<String> {
        self.state.chats.export_active()
    }

    /// Write an export file and return its path
    ///
    /// With `chat_index` set only that chat is exported. Without `output`
    /// the file is named after the export and placed in `dir`.
    pub fn export_to_file(
        &self,
        chat_index: Option<usize>,
        output: Option<&Path>,
        dir: &Path,
    ) -> Result<PathBuf> {
        let stamp = now_millis();
        let (json, default_name) = match chat_index {
            Some(index) => {
                let json = self.export_chat(index)?;
                let title = &self.state.chats.sessions()[index].title;
                (json, transfer::chat_export_file_name(title, stamp))
            }
            None => (self.export_all()?, transfer::export_all_file_name(stamp)),
        };

        let path = match output {
            Some(path) => path.to_path_buf(),
            None => dir.join(default_name),
        };
        std::fs::write(&path, json)?;
        tracing::info!("Exported chat history to {}", path.display());
        Ok(path)
    }

    /// Append the chats and folders of an import document
    ///
    /// Nothing changes if the document is malformed.
    pub fn import(&mut self, text: &str) -> Result<ImportSummary> {
        let summary =
            transfer::import_batch(text, &mut self.state.chats, &mut self.state.folders)?;
        self.flush()?;
        Ok(summary)
    }

    /// Read an import document from `path` and import it
    pub fn import_file(&mut self, path: &Path) -> Result<ImportSummary> {
        let text = std::fs::read_to_string(path)?;
        self.import(&text)
    }

    /// Remove every chat and folder, in memory and in storage
    pub fn clear_all(&mut self) -> Result<()> {
        self.state.clear_all();
        self.storage.clear()?;
        tracing::info!("Cleared all chat history");
        Ok(())
    }

    /// Chat list rows
    pub fn chat_list(&self) -> Vec<ChatListItem> {
        render::project_chat_list(&self.state.chats)
    }

    /// Chat list rows matching `query`
    pub fn search(&self, query: &str) -> Vec<ChatListItem> {
        render::filter_by_text(query, &self.chat_list())
    }

    /// Chat list rows belonging to the folder at `folder_index`
    pub fn folder_chats(&self, folder_index: usize) -> Result<Vec<ChatListItem>> {
        let folder = self
            .state
            .folders
            .get(folder_index)
            .ok_or_else(|| StudyBuddyError::NotFound(format!("folder {}", folder_index + 1)))?;
        Ok(render::filter_by_folder(folder, &self.chat_list()))
    }

    /// Folder list rows
    pub fn folder_list(&self) -> Vec<FolderListItem> {
        render::project_folder_list(&self.state.folders)
    }

    /// Share transcript of the active chat
    pub fn share_active(&self) -> Result<String> {
        self.state
            .chats
            .active()
            .map(render::share_text)
            .ok_or_else(|| StudyBuddyError::NotFound("No conversation to share".to_string()).into())
    }
}

fn load_or_empty<T>(loaded: Result<Vec<T>>, what: &str) -> Result<Vec<T>> {
    match loaded {
        Ok(items) => Ok(items),
        Err(e) if matches!(kind_of(&e), Some(StudyBuddyError::Parse(_))) => {
            tracing::warn!("Ignoring unreadable {}: {}", what, e);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

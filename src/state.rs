//! Application state
//!
//! `AppState` owns both stores, the active selection (inside the chat store)
//! and the per-chat reply state. Sending a message is split in two so the
//! await on the gateway sits between two synchronous state transitions:
//!
//! ```text
//! Idle --begin_send--> AwaitingReply --complete_send--> Idle
//! ```
//!
//! A second `begin_send` on a chat that is awaiting a reply is rejected, and
//! replies are routed by chat id rather than by whatever is active when they
//! arrive.

use crate::chats::{ChatStore, TextLimits};
use crate::config::DEFAULT_FALLBACK_MESSAGE;
use crate::error::{Result, StudyBuddyError};
use crate::folders::FolderStore;
use crate::gateway::ReplyGateway;
use crate::models::{ChatId, ChatSession, Folder, Role};
use std::collections::HashSet;

/// Reply state of a single chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyState {
    /// No request in flight
    Idle,
    /// A user message was sent and its reply has not arrived
    AwaitingReply,
}

/// A sent message whose reply is outstanding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    /// Chat the reply belongs to
    pub chat_id: ChatId,
    /// Trimmed message text to send to the gateway
    pub message: String,
    /// Whether this send created the chat
    pub started_chat: bool,
    previous_timestamp: i64,
}

/// The bot message appended when a reply completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredReply {
    /// Chat the message was appended to
    pub chat_id: ChatId,
    /// Appended text (the reply, or the fallback message)
    pub text: String,
    /// Whether the gateway failed and the fallback text was used
    pub fell_back: bool,
}

/// Chat and folder state shared by every front-end action
#[derive(Debug, Clone)]
pub struct AppState {
    /// Chat sessions and the active selection
    pub chats: ChatStore,
    /// Folders
    pub folders: FolderStore,
    awaiting: HashSet<ChatId>,
    fallback_message: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(TextLimits::default(), DEFAULT_FALLBACK_MESSAGE)
    }
}

impl AppState {
    /// Empty state
    pub fn new(limits: TextLimits, fallback_message: impl Into<String>) -> Self {
        Self {
            chats: ChatStore::with_limits(limits),
            folders: FolderStore::new(),
            awaiting: HashSet::new(),
            fallback_message: fallback_message.into(),
        }
    }

    /// State seeded from persisted lists, nothing active
    pub fn from_lists(
        chats: Vec<ChatSession>,
        folders: Vec<Folder>,
        limits: TextLimits,
        fallback_message: impl Into<String>,
    ) -> Self {
        Self {
            chats: ChatStore::from_sessions(chats, limits),
            folders: FolderStore::from_folders(folders),
            awaiting: HashSet::new(),
            fallback_message: fallback_message.into(),
        }
    }

    /// Text appended when the gateway fails
    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    /// Reply state of `chat_id`
    pub fn reply_state(&self, chat_id: ChatId) -> ReplyState {
        if self.awaiting.contains(&chat_id) {
            ReplyState::AwaitingReply
        } else {
            ReplyState::Idle
        }
    }

    /// Record a user message and mark its chat as awaiting a reply
    ///
    /// Starts a new chat when none is active.
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::InvalidInput` for blank text and
    /// `StudyBuddyError::ReplyPending` if the active chat already awaits a
    /// reply
    pub fn begin_send(&mut self, text: &str) -> Result<PendingReply> {
        let message = text.trim();
        if message.is_empty() {
            return Err(StudyBuddyError::InvalidInput("Message cannot be empty".to_string()).into());
        }

        let (chat_id, started_chat, previous_timestamp) = match self.chats.active_index() {
            Some(index) => {
                let (chat_id, timestamp) = self
                    .chats
                    .get(index)
                    .map(|s| (s.id, s.timestamp))
                    .ok_or_else(|| StudyBuddyError::NotFound(format!("chat {}", index + 1)))?;
                if self.awaiting.contains(&chat_id) {
                    return Err(StudyBuddyError::ReplyPending(chat_id).into());
                }
                self.chats.append_message(index, message, Role::User)?;
                (chat_id, false, timestamp)
            }
            None => {
                let session = self.chats.create_from_message(message);
                (session.id, true, session.timestamp)
            }
        };

        self.awaiting.insert(chat_id);
        tracing::debug!(chat_id, "Awaiting reply");

        Ok(PendingReply {
            chat_id,
            message: message.to_string(),
            started_chat,
            previous_timestamp,
        })
    }

    /// Undo a `begin_send` whose message was never sent
    ///
    /// The chat returns to idle. A chat started by the send is removed again
    /// (which also clears the selection); otherwise the user message is taken
    /// back off the chat and its timestamp restored.
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::NotFound` if the chat no longer holds the
    /// pending message
    pub fn abort_send(&mut self, pending: &PendingReply) -> Result<()> {
        self.awaiting.remove(&pending.chat_id);

        let Some(index) = self.chats.position_of(pending.chat_id) else {
            return Ok(());
        };
        if pending.started_chat {
            self.chats.delete(index)?;
        } else {
            self.chats
                .retract_last_message(index, pending.previous_timestamp)?;
        }

        tracing::debug!(chat_id = pending.chat_id, "Aborted send");
        Ok(())
    }

    /// Append the reply (or the fallback message) and return the chat to idle
    ///
    /// Returns `None` if the chat was deleted while the reply was in flight.
    pub fn complete_send(
        &mut self,
        pending: PendingReply,
        outcome: Result<String>,
    ) -> Result<Option<DeliveredReply>> {
        self.awaiting.remove(&pending.chat_id);

        let (text, fell_back) = match outcome {
            Ok(reply) => (reply, false),
            Err(e) => {
                tracing::warn!(chat_id = pending.chat_id, "Reply failed: {}", e);
                (self.fallback_message.clone(), true)
            }
        };

        let Some(index) = self.chats.position_of(pending.chat_id) else {
            tracing::warn!(
                chat_id = pending.chat_id,
                "Dropping reply for a chat that no longer exists"
            );
            return Ok(None);
        };

        self.chats.append_message(index, &text, Role::Bot)?;
        Ok(Some(DeliveredReply {
            chat_id: pending.chat_id,
            text,
            fell_back,
        }))
    }

    /// Send `text` through `gateway` and record both sides of the exchange
    pub async fn send_message(
        &mut self,
        text: &str,
        gateway: &dyn ReplyGateway,
    ) -> Result<Option<DeliveredReply>> {
        let pending = self.begin_send(text)?;
        let outcome = gateway.send(&pending.message).await;
        self.complete_send(pending, outcome)
    }

    /// Add the active chat to the folder at `folder_index`
    ///
    /// Returns whether the chat was newly added.
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::NotFound` if no chat is active or the
    /// folder index is out of range
    pub fn move_active_to_folder(&mut self, folder_index: usize) -> Result<bool> {
        let chat_id = self
            .chats
            .active()
            .map(|s| s.id)
            .ok_or_else(|| StudyBuddyError::NotFound("No conversation selected".to_string()))?;
        if self.folders.is_empty() {
            return Err(StudyBuddyError::NotFound("Create a folder first!".to_string()).into());
        }
        self.folders.add_chat_id(folder_index, chat_id)
    }

    /// Empty both stores and forget pending replies
    pub fn clear_all(&mut self) {
        self.chats.clear();
        self.folders.clear();
        self.awaiting.clear();
    }
}

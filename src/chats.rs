//! Chat store
//!
//! In-memory, most-recent-first list of chat sessions plus the active
//! selection. The store is deterministic and never touches storage; the
//! orchestrator in [`crate::app`] flushes after each mutation.

use crate::error::{Result, StudyBuddyError};
use crate::models::{
    mint_id, now_millis, raise_id_floor, truncate_chars, truncate_with_ellipsis, ChatId,
    ChatMessage, ChatSession, Role,
};

/// Default number of characters kept in a generated title
pub const DEFAULT_TITLE_MAX_CHARS: usize = 50;

/// Default number of characters kept in a preview
pub const DEFAULT_PREVIEW_MAX_CHARS: usize = 100;

/// Character limits applied when deriving titles and previews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLimits {
    /// Characters kept in a title before `...` is appended
    pub title_max_chars: usize,
    /// Characters kept in a preview
    pub preview_max_chars: usize,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            preview_max_chars: DEFAULT_PREVIEW_MAX_CHARS,
        }
    }
}

/// Ordered list of chat sessions with an optional active selection
#[derive(Debug, Clone, Default)]
pub struct ChatStore {
    sessions: Vec<ChatSession>,
    active: Option<usize>,
    last_id: ChatId,
    limits: TextLimits,
}

impl ChatStore {
    /// Create an empty store with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with custom title/preview limits
    pub fn with_limits(limits: TextLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Create a store holding previously persisted sessions, nothing active
    pub fn from_sessions(sessions: Vec<ChatSession>, limits: TextLimits) -> Self {
        let mut store = Self::with_limits(limits);
        store.extend(sessions);
        store
    }

    /// All sessions, most recent first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Number of sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Session at `index`, if any
    pub fn get(&self, index: usize) -> Option<&ChatSession> {
        self.sessions.get(index)
    }

    /// Index of the first session with `id`
    ///
    /// Imported sessions may share ids; the first match wins.
    pub fn position_of(&self, id: ChatId) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == id)
    }

    /// Index of the active session
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The active session
    pub fn active(&self) -> Option<&ChatSession> {
        self.active.and_then(|i| self.sessions.get(i))
    }

    /// Make the session at `index` active
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::NotFound` if `index` is out of range
    pub fn select(&mut self, index: usize) -> Result<&ChatSession> {
        self.check_index(index)?;
        self.active = Some(index);
        Ok(&self.sessions[index])
    }

    /// Drop the active selection ("new chat")
    pub fn clear_selection(&mut self) {
        self.active = None;
    }

    /// Start a session from its first user message
    ///
    /// The session is inserted at the front and becomes active. Its title is
    /// the first `title_max_chars` characters (plus `...` when cut) and its
    /// preview the first `preview_max_chars` characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use studybuddy::chats::ChatStore;
    ///
    /// let mut store = ChatStore::new();
    /// let session = store.create_from_message("Explain gravity");
    /// assert_eq!(session.title, "Explain gravity");
    /// assert_eq!(session.messages.len(), 1);
    /// assert_eq!(store.active_index(), Some(0));
    /// ```
    pub fn create_from_message(&mut self, text: &str) -> &ChatSession {
        let id = mint_id(&mut self.last_id);
        let session = ChatSession {
            id,
            title: truncate_with_ellipsis(text, self.limits.title_max_chars),
            preview: truncate_chars(text, self.limits.preview_max_chars),
            messages: vec![ChatMessage::user(text)],
            timestamp: now_millis(),
            saved: false,
        };
        tracing::debug!(chat_id = id, "Created chat session");

        self.sessions.insert(0, session);
        self.active = Some(0);
        &self.sessions[0]
    }

    /// Append a message to the session at `index`
    ///
    /// Updates the session timestamp; a bot message also replaces the preview.
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::NotFound` if `index` is out of range
    pub fn append_message(&mut self, index: usize, text: &str, role: Role) -> Result<()> {
        self.check_index(index)?;
        let preview_max = self.limits.preview_max_chars;
        let session = &mut self.sessions[index];

        session.messages.push(ChatMessage {
            text: text.to_string(),
            role,
        });
        session.timestamp = now_millis();
        if role == Role::Bot {
            session.preview = truncate_chars(text, preview_max);
        }

        tracing::debug!(
            chat_id = session.id,
            role = %role,
            messages = session.messages.len(),
            "Appended message"
        );
        Ok(())
    }

    /// Remove the last message of the session at `index` and reset its
    /// timestamp to `timestamp`
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::NotFound` if `index` is out of range or the
    /// session has no messages
    pub fn retract_last_message(&mut self, index: usize, timestamp: i64) -> Result<ChatMessage> {
        self.check_index(index)?;
        let session = &mut self.sessions[index];
        let message = session.messages.pop().ok_or_else(|| {
            StudyBuddyError::NotFound(format!("No message to retract in chat {}", index + 1))
        })?;
        session.timestamp = timestamp;
        Ok(message)
    }

    /// Rename the session at `index`
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::InvalidInput` if the trimmed title is empty,
    /// or `StudyBuddyError::NotFound` if `index` is out of range
    pub fn rename(&mut self, index: usize, new_title: &str) -> Result<()> {
        let title = new_title.trim();
        if title.is_empty() {
            return Err(StudyBuddyError::InvalidInput("Please enter a name".to_string()).into());
        }
        self.check_index(index)?;
        self.sessions[index].title = title.to_string();
        Ok(())
    }

    /// Remove the session at `index` and return it
    ///
    /// Clears the selection if the removed session was active and keeps it
    /// pointing at the same session otherwise.
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::NotFound` if `index` is out of range
    pub fn delete(&mut self, index: usize) -> Result<ChatSession> {
        self.check_index(index)?;
        let removed = self.sessions.remove(index);
        self.active = match self.active {
            Some(a) if a == index => None,
            Some(a) if a > index => Some(a - 1),
            other => other,
        };
        tracing::debug!(chat_id = removed.id, "Deleted chat session");
        Ok(removed)
    }

    /// Serialize the session at `index` as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::NotFound` if `index` is out of range
    pub fn export_one(&self, index: usize) -> Result<String> {
        let session = self
            .get(index)
            .ok_or_else(|| StudyBuddyError::NotFound(format!("chat {}", index + 1)))?;
        Ok(serde_json::to_string_pretty(session)?)
    }

    /// Serialize the active session as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::NotFound` if no session is active
    pub fn export_active(&self) -> Result<String> {
        let index = self
            .active
            .ok_or_else(|| StudyBuddyError::NotFound("No conversation to export".to_string()))?;
        self.export_one(index)
    }

    /// Append sessions to the end of the list without de-duplication
    pub fn extend(&mut self, sessions: Vec<ChatSession>) {
        for s in &sessions {
            raise_id_floor(&mut self.last_id, s.id);
        }
        self.sessions.extend(sessions);
    }

    /// Remove every session and the selection
    ///
    /// The id floor is kept so ids stay unique for the store's lifetime.
    pub fn clear(&mut self) {
        self.sessions.clear();
        self.active = None;
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.sessions.len() {
            return Err(StudyBuddyError::NotFound(format!(
                "chat {} (have {})",
                index + 1,
                self.sessions.len()
            ))
            .into());
        }
        Ok(())
    }
}

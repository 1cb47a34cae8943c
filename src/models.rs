//! Chat and folder records
//!
//! These are the plain records held by the chat and folder stores and
//! persisted verbatim as JSON arrays. Field names match the persisted layout
//! (`timestamp` and `id` are epoch milliseconds).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a chat session (creation time in epoch milliseconds)
pub type ChatId = i64;

/// Identifier of a folder (creation time in epoch milliseconds)
pub type FolderId = i64;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the user
    User,
    /// Produced by the reply backend (or the fallback text)
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// A single message in a chat session
///
/// Older exports store the role under `type`; both keys are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message body
    pub text: String,
    /// Who wrote it
    #[serde(alias = "type")]
    pub role: Role,
}

impl ChatMessage {
    /// Creates a user message
    ///
    /// # Examples
    ///
    /// ```
    /// use studybuddy::models::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::user("Explain gravity");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: Role::User,
        }
    }

    /// Creates a bot message
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: Role::Bot,
        }
    }
}

/// A chat session with its full message history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique id, immutable
    pub id: ChatId,
    /// Display title, renamable
    pub title: String,
    /// Short preview of the most recent bot reply
    pub preview: String,
    /// Append-only message history
    pub messages: Vec<ChatMessage>,
    /// Last-modified time in epoch milliseconds
    pub timestamp: i64,
    /// Display-only marker; nothing sets it yet
    #[serde(default)]
    pub saved: bool,
}

/// Palette of folder colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FolderColor {
    /// Default selection
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Pink,
}

impl FolderColor {
    /// All palette entries in display order
    pub const ALL: [FolderColor; 6] = [
        Self::Blue,
        Self::Green,
        Self::Purple,
        Self::Orange,
        Self::Red,
        Self::Pink,
    ];

    /// Parse a palette color from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use studybuddy::models::FolderColor;
    ///
    /// assert_eq!(FolderColor::parse_str("Green").unwrap(), FolderColor::Green);
    /// assert!(FolderColor::parse_str("teal").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "purple" => Ok(Self::Purple),
            "orange" => Ok(Self::Orange),
            "red" => Ok(Self::Red),
            "pink" => Ok(Self::Pink),
            other => Err(format!(
                "Unknown folder color: {}. Must be one of: {}",
                other,
                Self::ALL
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

impl fmt::Display for FolderColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Pink => "pink",
        };
        write!(f, "{}", name)
    }
}

/// A named, colored group of chat ids
///
/// `chats` holds weak references: ids of chats that may since have been
/// deleted are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique id
    pub id: FolderId,
    /// Display name, never empty
    pub name: String,
    /// Palette color
    #[serde(default)]
    pub color: FolderColor,
    /// Member chat ids, insertion ordered and free of duplicates
    #[serde(default)]
    pub chats: Vec<ChatId>,
}

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Largest id accepted from imported or persisted records
///
/// Ids are epoch milliseconds; anything above 2^53 - 1 cannot have come from
/// the clock and would leave no room to mint ids above it.
pub const MAX_RECORD_ID: i64 = 9_007_199_254_740_991;

/// Mint an id from the clock that is strictly greater than `last`
///
/// Two ids requested within the same millisecond would otherwise collide.
pub(crate) fn mint_id(last: &mut i64) -> i64 {
    let id = now_millis().max(last.saturating_add(1));
    *last = id;
    id
}

/// Raise the mint floor to `id` unless it is out of range
pub(crate) fn raise_id_floor(last: &mut i64, id: i64) {
    if id > MAX_RECORD_ID {
        tracing::warn!(id, "Ignoring out-of-range id when raising the id floor");
        return;
    }
    *last = (*last).max(id);
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// First `max_chars` characters of `text`, with `...` appended when cut
///
/// # Examples
///
/// ```
/// use studybuddy::models::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("short", 50), "short");
/// assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc...");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let mut out = truncate_chars(text, max_chars);
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

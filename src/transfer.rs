//! Export and import of chat history
//!
//! A full export is a JSON document `{chats, folders, exportDate}`; a single
//! chat export is the session object itself. Imports accept any document with
//! optional `chats` and `folders` arrays and append them to the stores.

use crate::chats::ChatStore;
use crate::error::{Result, StudyBuddyError};
use crate::folders::FolderStore;
use crate::models::{ChatSession, Folder, MAX_RECORD_ID};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Full export document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBundle {
    /// Every chat session, in store order
    pub chats: Vec<ChatSession>,
    /// Every folder, in store order
    pub folders: Vec<Folder>,
    /// ISO-8601 UTC export time
    #[serde(rename = "exportDate")]
    pub export_date: String,
}

/// Parsed import document
///
/// Both arrays are optional; a missing array imports nothing of that kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportBatch {
    /// Sessions to append
    #[serde(default)]
    pub chats: Option<Vec<ChatSession>>,
    /// Folders to append
    #[serde(default)]
    pub folders: Option<Vec<Folder>>,
}

/// Counts of records appended by an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Sessions appended
    pub chats: usize,
    /// Folders appended
    pub folders: usize,
}

/// Serialize both stores as a pretty JSON export document
///
/// # Examples
///
/// ```
/// use studybuddy::chats::ChatStore;
/// use studybuddy::folders::FolderStore;
/// use studybuddy::transfer::export_all;
///
/// let mut chats = ChatStore::new();
/// chats.create_from_message("Explain gravity");
/// let json = export_all(&chats, &FolderStore::new(), chrono::Utc::now()).unwrap();
/// assert!(json.contains("\"exportDate\""));
/// ```
pub fn export_all(chats: &ChatStore, folders: &FolderStore, now: DateTime<Utc>) -> Result<String> {
    let bundle = ExportBundle {
        chats: chats.sessions().to_vec(),
        folders: folders.folders().to_vec(),
        export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    Ok(serde_json::to_string_pretty(&bundle)?)
}

/// Parse an import document
///
/// # Errors
///
/// Returns `StudyBuddyError::Parse` if `text` is not a JSON object with
/// well-formed `chats`/`folders` arrays
pub fn parse_import(text: &str) -> Result<ImportBatch> {
    serde_json::from_str(text)
        .map_err(|e| StudyBuddyError::Parse(format!("Error importing file: {}", e)).into())
}

/// Parse `text` and append its chats and folders to the stores
///
/// Nothing is appended when parsing or validation fails. Imported ids are
/// not checked against existing ones.
///
/// # Errors
///
/// Returns `StudyBuddyError::Parse` on malformed input and
/// `StudyBuddyError::InvalidInput` if any id falls outside `0..=MAX_RECORD_ID`
pub fn import_batch(
    text: &str,
    chats: &mut ChatStore,
    folders: &mut FolderStore,
) -> Result<ImportSummary> {
    let batch = parse_import(text)?;
    let chat_ids = batch.chats.iter().flatten().map(|c| c.id);
    let folder_ids = batch.folders.iter().flatten().map(|f| f.id);
    check_record_ids(chat_ids.chain(folder_ids))?;

    let mut summary = ImportSummary::default();

    if let Some(imported) = batch.chats {
        summary.chats = imported.len();
        chats.extend(imported);
    }
    if let Some(imported) = batch.folders {
        summary.folders = imported.len();
        folders.extend(imported);
    }

    tracing::info!(
        chats = summary.chats,
        folders = summary.folders,
        "Imported chat history"
    );
    Ok(summary)
}

fn check_record_ids(mut ids: impl Iterator<Item = i64>) -> Result<()> {
    match ids.find(|id| !(0..=MAX_RECORD_ID).contains(id)) {
        Some(id) => Err(StudyBuddyError::InvalidInput(format!(
            "Error importing file: id {} is out of range",
            id
        ))
        .into()),
        None => Ok(()),
    }
}

/// File name for a full export, e.g. `studybuddy-export-1700000000000.json`
pub fn export_all_file_name(now_millis: i64) -> String {
    format!("studybuddy-export-{}.json", now_millis)
}

/// File name for a single-chat export
///
/// Every character of the title outside `[A-Za-z0-9]` becomes `_`.
///
/// # Examples
///
/// ```
/// use studybuddy::transfer::chat_export_file_name;
///
/// assert_eq!(
///     chat_export_file_name("What is 2+2?", 17),
///     "What_is_2_2_-17.json"
/// );
/// ```
pub fn chat_export_file_name(title: &str, now_millis: i64) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^A-Za-z0-9]").expect("valid regex"));
    format!("{}-{}.json", re.replace_all(title, "_"), now_millis)
}

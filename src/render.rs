//! View projection and terminal rendering
//!
//! The projection functions are pure: they map store state to list items and
//! filter those items, and are recomputed after every change. The `print_*`
//! functions draw the items on the terminal.

use crate::chats::ChatStore;
use crate::folders::FolderStore;
use crate::models::{ChatId, ChatSession, Folder, FolderColor, FolderId, Role};
use colored::{ColoredString, Colorize};
use prettytable::{format, Table};

/// One row of the chat list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatListItem {
    /// Position in the chat store (0-based)
    pub index: usize,
    /// Chat id
    pub id: ChatId,
    /// Title text
    pub title: String,
    /// Preview text
    pub preview: String,
    /// Whether to show the "Saved" badge
    pub saved_badge: bool,
    /// Whether this is the active chat
    pub is_active: bool,
}

/// One row of the folder list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderListItem {
    /// Position in the folder store (0-based)
    pub index: usize,
    /// Folder id
    pub id: FolderId,
    /// Folder name
    pub name: String,
    /// Palette color
    pub color: FolderColor,
    /// Number of member ids, dangling ones included
    pub chat_count: usize,
}

/// Project the chat store into list rows, in store order
pub fn project_chat_list(chats: &ChatStore) -> Vec<ChatListItem> {
    let active = chats.active_index();
    chats
        .sessions()
        .iter()
        .enumerate()
        .map(|(index, session)| ChatListItem {
            index,
            id: session.id,
            title: session.title.clone(),
            preview: session.preview.clone(),
            saved_badge: session.saved,
            is_active: active == Some(index),
        })
        .collect()
}

/// Project the folder store into list rows, in store order
pub fn project_folder_list(folders: &FolderStore) -> Vec<FolderListItem> {
    folders
        .folders()
        .iter()
        .enumerate()
        .map(|(index, folder)| FolderListItem {
            index,
            id: folder.id,
            name: folder.name.clone(),
            color: folder.color,
            chat_count: folder.chats.len(),
        })
        .collect()
}

/// Rows whose title or preview contains `query`, ignoring case
///
/// # Examples
///
/// ```
/// use studybuddy::chats::ChatStore;
/// use studybuddy::render::{filter_by_text, project_chat_list};
///
/// let mut chats = ChatStore::new();
/// chats.create_from_message("Newton's laws");
/// chats.create_from_message("Cell biology");
/// let rows = project_chat_list(&chats);
/// let hits = filter_by_text("NEWTON", &rows);
/// assert_eq!(hits.len(), 1);
/// ```
pub fn filter_by_text(query: &str, list: &[ChatListItem]) -> Vec<ChatListItem> {
    let query = query.to_lowercase();
    list.iter()
        .filter(|item| {
            item.title.to_lowercase().contains(&query)
                || item.preview.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// Rows whose chat id is a member of `folder`
pub fn filter_by_folder(folder: &Folder, list: &[ChatListItem]) -> Vec<ChatListItem> {
    list.iter()
        .filter(|item| folder.chats.contains(&item.id))
        .cloned()
        .collect()
}

/// Plain-text transcript used for sharing a chat
///
/// # Examples
///
/// ```
/// use studybuddy::chats::ChatStore;
/// use studybuddy::models::Role;
/// use studybuddy::render::share_text;
///
/// let mut chats = ChatStore::new();
/// chats.create_from_message("Hi");
/// chats.append_message(0, "Hello!", Role::Bot).unwrap();
/// assert_eq!(share_text(chats.get(0).unwrap()), "Hi\n\nUSER: Hi\n\nBOT: Hello!");
/// ```
pub fn share_text(session: &ChatSession) -> String {
    let body = session
        .messages
        .iter()
        .map(|m| format!("{}: {}", m.role.to_string().to_uppercase(), m.text))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{}\n\n{}", session.title, body)
}

/// Folder name painted in its palette color
pub fn colored_folder_name(name: &str, color: FolderColor) -> ColoredString {
    match color {
        FolderColor::Blue => name.blue(),
        FolderColor::Green => name.green(),
        FolderColor::Purple => name.purple(),
        FolderColor::Orange => name.yellow(),
        FolderColor::Red => name.red(),
        FolderColor::Pink => name.magenta(),
    }
}

/// Print chat rows as a table
pub fn print_chat_list(items: &[ChatListItem]) {
    if items.is_empty() {
        println!("{}", "No conversations found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "#".bold(),
        "Title".bold(),
        "Preview".bold()
    ]);

    for item in items {
        let number = if item.is_active {
            format!("*{}", item.index + 1).green().bold()
        } else {
            (item.index + 1).to_string().cyan()
        };
        let title = if item.saved_badge {
            format!("{} {}", item.title, "[Saved]".green())
        } else {
            item.title.clone()
        };
        table.add_row(prettytable::row![number, title, item.preview]);
    }

    table.printstd();
}

/// Print folder rows as a table
pub fn print_folder_list(items: &[FolderListItem]) {
    if items.is_empty() {
        println!("{}", "No folders yet.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "#".bold(),
        "Folder".bold(),
        "Color".bold(),
        "Chats".bold()
    ]);

    for item in items {
        table.add_row(prettytable::row![
            (item.index + 1).to_string().cyan(),
            colored_folder_name(&item.name, item.color),
            item.color,
            item.chat_count
        ]);
    }

    table.printstd();
}

/// Print every message of a chat
pub fn print_transcript(session: &ChatSession) {
    println!("\n{}\n", session.title.bold());
    for message in &session.messages {
        print_message(message.role, &message.text);
    }
}

/// Print a single message with a role label
pub fn print_message(role: Role, text: &str) {
    match role {
        Role::User => println!("{} {}\n", "You:".cyan().bold(), text),
        Role::Bot => println!("{} {}\n", "StudyBuddy:".purple().bold(), text),
    }
}

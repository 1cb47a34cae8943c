//! Chat history commands: list, show, rename, delete, export, import, clear

use super::{print_notice, print_success, resolve_folder, to_index};
use crate::app::App;
use crate::error::{Result, StudyBuddyError};
use crate::render;
use colored::Colorize;
use std::path::Path;

/// List chats, optionally filtered by text and folder
///
/// Both filters apply when both are given.
pub fn handle_list(app: &App, search: Option<&str>, folder: Option<&str>) -> Result<()> {
    let mut items = match folder {
        Some(folder) => app.folder_chats(resolve_folder(app, folder)?)?,
        None => app.chat_list(),
    };
    if let Some(query) = search {
        items = render::filter_by_text(query, &items);
    }

    println!("\nConversations:");
    render::print_chat_list(&items);
    println!();
    println!(
        "Use {} to continue a conversation.",
        "studybuddy chat --resume <#>".cyan()
    );
    println!();
    Ok(())
}

/// Print the transcript of the chat at `position`
pub fn handle_show(app: &App, position: usize) -> Result<()> {
    let index = to_index(position)?;
    let session = app
        .state()
        .chats
        .get(index)
        .ok_or_else(|| StudyBuddyError::NotFound(format!("chat {}", position)))?;
    render::print_transcript(session);
    Ok(())
}

/// Rename the chat at `position`
pub fn handle_rename(app: &mut App, position: usize, title: &str) -> Result<()> {
    app.rename_chat(to_index(position)?, title)?;
    print_success(&format!("Renamed chat {}", position));
    Ok(())
}

/// Delete the chat at `position`
pub fn handle_delete(app: &mut App, position: usize) -> Result<()> {
    let removed = app.delete_chat(to_index(position)?)?;
    print_success(&format!("Deleted conversation \"{}\"", removed.title));
    Ok(())
}

/// Export every chat, or the one at `chat`, to a JSON file
///
/// Without `output` the file gets a generated name in `working_dir`.
pub fn handle_export(
    app: &App,
    chat: Option<usize>,
    output: Option<&Path>,
    working_dir: &Path,
) -> Result<()> {
    let chat_index = chat.map(to_index).transpose()?;
    let written = app.export_to_file(chat_index, output, working_dir)?;
    print_success(&format!("Exported to {}", written.display()));
    Ok(())
}

/// Import chats and folders from an export file
pub fn handle_import(app: &mut App, path: &Path) -> Result<()> {
    let summary = app.import_file(path)?;
    print_success(&format!(
        "Imported {} chats and {} folders",
        summary.chats, summary.folders
    ));
    Ok(())
}

/// Delete every chat and folder
///
/// # Errors
///
/// Returns `StudyBuddyError::InvalidInput` unless `confirmed`
pub fn handle_clear(app: &mut App, confirmed: bool) -> Result<()> {
    if !confirmed {
        print_notice("This deletes every chat and folder. Re-run with --yes to confirm.");
        return Err(StudyBuddyError::InvalidInput("Clear not confirmed".to_string()).into());
    }
    app.clear_all()?;
    print_success("All chats and folders deleted");
    Ok(())
}

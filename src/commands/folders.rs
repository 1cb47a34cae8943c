//! Folder management commands

use super::{print_notice, print_success, resolve_folder, to_index};
use crate::app::App;
use crate::cli::FolderCommand;
use crate::error::Result;
use crate::render;

/// Handle folder commands
pub fn handle_folder(app: &mut App, command: FolderCommand) -> Result<()> {
    match command {
        FolderCommand::Create { name, color } => {
            let folder = app.create_folder(&name, color)?;
            print_success(&format!("Folder \"{}\" created", folder.name));
        }
        FolderCommand::Rename { folder, name } => {
            let index = resolve_folder(app, &folder)?;
            app.rename_folder(index, &name)?;
            print_success(&format!("Folder renamed to \"{}\"", name.trim()));
        }
        FolderCommand::Delete { folder } => {
            let index = resolve_folder(app, &folder)?;
            let removed = app.delete_folder(index)?;
            print_success(&format!("Folder \"{}\" deleted", removed.name));
        }
        FolderCommand::Add { folder, chat } => {
            let index = resolve_folder(app, &folder)?;
            if app.add_chat_to_folder(index, to_index(chat)?)? {
                print_success("Chat added to folder");
            } else {
                print_notice("Chat is already in that folder");
            }
        }
        FolderCommand::List => {
            println!("\nFolders:");
            render::print_folder_list(&app.folder_list());
            println!();
        }
    }
    Ok(())
}

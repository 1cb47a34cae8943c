/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`: Interactive chat session with slash commands
- `send`: One-shot message
- `history`: Chat listing, transcripts, rename/delete, export/import, clear
- `folders`: Folder management

Handlers receive an opened `App` and print their results; every mutation has
already been flushed to storage when a handler returns.
*/

use crate::app::App;
use crate::error::{Result, StudyBuddyError};
use colored::Colorize;

// Special commands parser for interactive chat
pub mod special_commands;

// Chat history commands
pub mod history;

// Folder management commands
pub mod folders;

/// Convert a 1-based position typed by the user into a store index
///
/// # Errors
///
/// Returns `StudyBuddyError::InvalidInput` for position 0
pub fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| StudyBuddyError::InvalidInput("Positions start at 1".to_string()).into())
}

/// Resolve a folder given by name (case-insensitive) or 1-based position
///
/// # Errors
///
/// Returns `StudyBuddyError::NotFound` if no folder matches
pub fn resolve_folder(app: &App, folder: &str) -> Result<usize> {
    let folders = &app.state().folders;
    if let Some(index) = folders.find_by_name(folder) {
        return Ok(index);
    }
    if let Ok(position) = folder.trim().parse::<usize>() {
        let index = to_index(position)?;
        if index < folders.len() {
            return Ok(index);
        }
    }
    Err(StudyBuddyError::NotFound(format!("folder {}", folder)).into())
}

/// Index of the active chat
///
/// # Errors
///
/// Returns `StudyBuddyError::NotFound` if no chat is active
pub fn active_index(app: &App) -> Result<usize> {
    app.state()
        .chats
        .active_index()
        .ok_or_else(|| StudyBuddyError::NotFound("No conversation selected".to_string()).into())
}

pub(crate) fn print_success(message: &str) {
    println!("{}", message.green());
}

pub(crate) fn print_notice(message: &str) {
    println!("{}", message.yellow());
}

pub(crate) fn print_failure(err: &anyhow::Error) {
    println!("{}", err.to_string().red());
}

// Interactive chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Runs a readline-based loop. Slash commands act on the chat and folder
    //! lists; any other input is sent to the backend in the active chat, or
    //! starts a new chat when none is active. No error ends the session: it
    //! is shown as a status line and the state is left unchanged.

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use crate::models::Role;
    use crate::render;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::path::{Path, PathBuf};

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `app` - Opened application
    /// * `resume` - Optional 1-based position of a chat to continue
    pub async fn run_chat(app: &mut App, resume: Option<usize>) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        if let Some(position) = resume {
            let session = app.select_chat(to_index(position)?)?;
            render::print_transcript(session);
        }

        let working_dir = std::env::current_dir()?;
        let mut rl = DefaultEditor::new()?;
        print_welcome_banner();

        loop {
            let prompt = format_prompt(app);
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    record_history(rl.add_history_entry(trimmed));

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => send_and_print(app, trimmed).await,
                        Ok(command) => {
                            if let Err(e) = handle_special_command(app, command, &working_dir) {
                                print_failure(&e);
                            }
                        }
                        Err(e) => println!("{}", e.to_string().red()),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Log a line that could not be added to the readline history
    ///
    /// Returns whether the line was added.
    fn record_history(result: rustyline::Result<bool>) -> bool {
        match result {
            Ok(added) => added,
            Err(e) => {
                tracing::warn!("Could not record history entry: {}", e);
                false
            }
        }
    }

    /// Send `text` and print the reply (or the fallback message)
    pub async fn send_and_print(app: &mut App, text: &str) {
        println!("{}", "StudyBuddy is thinking...".dimmed());
        match app.send_message(text).await {
            Ok(Some(reply)) => render::print_message(Role::Bot, &reply.text),
            Ok(None) => print_notice("The chat was deleted before its reply arrived"),
            Err(e) => print_failure(&e),
        }
    }

    /// Execute a parsed special command
    ///
    /// `working_dir` is where exports without an explicit path are written.
    pub fn handle_special_command(
        app: &mut App,
        command: SpecialCommand,
        working_dir: &Path,
    ) -> Result<()> {
        match command {
            SpecialCommand::NewChat => {
                app.new_chat();
                print_notice("New chat: your next message starts it");
            }
            SpecialCommand::ListChats => render::print_chat_list(&app.chat_list()),
            SpecialCommand::Search(query) => render::print_chat_list(&app.search(&query)),
            SpecialCommand::Open(position) => {
                let session = app.select_chat(to_index(position)?)?;
                render::print_transcript(session);
            }
            SpecialCommand::Rename(title) => {
                let index = active_index(app)?;
                app.rename_chat(index, &title)?;
                print_success("Chat renamed");
            }
            SpecialCommand::Delete => {
                let index = active_index(app)?;
                let removed = app.delete_chat(index)?;
                print_success(&format!("Deleted \"{}\"", removed.title));
            }
            SpecialCommand::ListFolders => render::print_folder_list(&app.folder_list()),
            SpecialCommand::CreateFolder { name, color } => {
                let folder = app.create_folder(&name, color)?;
                print_success(&format!("Folder \"{}\" created", folder.name));
            }
            SpecialCommand::RenameFolder { position, name } => {
                app.rename_folder(to_index(position)?, &name)?;
                print_success("Folder renamed");
            }
            SpecialCommand::DeleteFolder(position) => {
                let removed = app.delete_folder(to_index(position)?)?;
                print_success(&format!("Folder \"{}\" deleted", removed.name));
            }
            SpecialCommand::ShowFolder(position) => {
                render::print_chat_list(&app.folder_chats(to_index(position)?)?)
            }
            SpecialCommand::MoveToFolder(position) => {
                if app.move_active_to_folder(to_index(position)?)? {
                    print_success("Chat added to folder");
                } else {
                    print_notice("Chat is already in that folder");
                }
            }
            SpecialCommand::Export(path) => {
                let index = app.state().chats.active_index().ok_or_else(|| {
                    StudyBuddyError::NotFound("No conversation to export".to_string())
                })?;
                let output = path.map(PathBuf::from);
                let written = app.export_to_file(Some(index), output.as_deref(), working_dir)?;
                print_success(&format!("Exported to {}", written.display()));
            }
            SpecialCommand::Share => println!("\n{}\n", app.share_active()?),
            SpecialCommand::Help => print_help(),
            SpecialCommand::Exit | SpecialCommand::None => {}
        }
        Ok(())
    }

    fn format_prompt(app: &App) -> String {
        match app.state().chats.active() {
            Some(session) => format!("[{}] >> ", session.title),
            None => "[new chat] >> ".to_string(),
        }
    }

    fn print_welcome_banner() {
        println!("{}", "StudyBuddy".purple().bold());
        println!("Ask a question to start a chat. Type /help for commands, exit to leave.\n");
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::config::ChatConfig;
        use crate::models::FolderColor;
        use crate::storage::Storage;
        use crate::test_utils::{assert_error_contains, temp_dir, ScriptedGateway};

        fn app_with(gateway: ScriptedGateway) -> App {
            App::with_parts(
                Storage::in_memory(),
                Box::new(gateway),
                &ChatConfig::default(),
            )
            .unwrap()
        }

        #[test]
        fn test_history_errors_do_not_end_session() {
            assert!(record_history(Ok(true)));
            assert!(!record_history(Ok(false)));
            assert!(!record_history(Err(ReadlineError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "history file is read-only",
            )))));
        }

        #[tokio::test]
        async fn test_send_and_print_records_reply() {
            let mut app = app_with(ScriptedGateway::replying(&["F = ma"]));
            send_and_print(&mut app, "Newton's second law?").await;
            assert_eq!(app.state().chats.active().unwrap().preview, "F = ma");
        }

        #[tokio::test]
        async fn test_commands_drive_folder_flow() {
            let dir = temp_dir();
            let mut app = app_with(ScriptedGateway::replying(&["ok"]));
            send_and_print(&mut app, "Limits").await;

            let run = |app: &mut App, input: &str| {
                let command = parse_special_command(input).unwrap();
                handle_special_command(app, command, dir.path())
            };

            run(&mut app, "/folder new Math orange").unwrap();
            run(&mut app, "/move 1").unwrap();
            assert_eq!(app.state().folders.get(0).unwrap().color, FolderColor::Orange);
            assert_eq!(app.folder_chats(0).unwrap().len(), 1);

            run(&mut app, "/rename Calculus").unwrap();
            assert_eq!(app.state().chats.active().unwrap().title, "Calculus");

            run(&mut app, "/export").unwrap();
            let exported: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
            assert_eq!(exported.len(), 1);

            run(&mut app, "/delete").unwrap();
            assert!(app.state().chats.is_empty());
            assert_error_contains(run(&mut app, "/share"), "No conversation to share");
            assert_error_contains(run(&mut app, "/export"), "No conversation to export");
        }

        #[test]
        fn test_open_out_of_range_is_error() {
            let dir = temp_dir();
            let mut app = app_with(ScriptedGateway::failing());
            let result = handle_special_command(&mut app, SpecialCommand::Open(4), dir.path());
            assert!(result.is_err());
        }

        #[test]
        fn test_format_prompt_shows_active_title() {
            let mut app = app_with(ScriptedGateway::failing());
            assert_eq!(format_prompt(&app), "[new chat] >> ");
            app.import(r#"{"chats":[{"id":1,"title":"Optics","preview":"","messages":[],"timestamp":1}]}"#)
                .unwrap();
            app.select_chat(0).unwrap();
            assert_eq!(format_prompt(&app), "[Optics] >> ");
        }
    }
}

// One-shot send command handler
pub mod send {
    //! One-shot message handler.

    use super::*;
    use crate::models::Role;
    use crate::render;

    /// Send `message` in a new chat, or in the chat at `chat` (1-based)
    ///
    /// A backend failure is not an error here: the fallback message is
    /// recorded and printed like any other reply.
    pub async fn run_send(app: &mut App, message: &str, chat: Option<usize>) -> Result<()> {
        match chat {
            Some(position) => {
                app.select_chat(to_index(position)?)?;
            }
            None => app.new_chat(),
        }

        render::print_message(Role::User, message.trim());
        match app.send_message(message).await? {
            Some(reply) => {
                if reply.fell_back {
                    tracing::warn!("Backend unavailable, recorded fallback reply");
                }
                render::print_message(Role::Bot, &reply.text);
            }
            None => print_notice("The chat was deleted before its reply arrived"),
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::config::{ChatConfig, DEFAULT_FALLBACK_MESSAGE};
        use crate::storage::Storage;
        use crate::test_utils::ScriptedGateway;

        #[tokio::test]
        async fn test_run_send_continues_given_chat() {
            let mut app = App::with_parts(
                Storage::in_memory(),
                Box::new(ScriptedGateway::replying(&["one", "two"])),
                &ChatConfig::default(),
            )
            .unwrap();

            run_send(&mut app, "first", None).await.unwrap();
            run_send(&mut app, "second", Some(1)).await.unwrap();
            assert_eq!(app.state().chats.len(), 1);
            assert_eq!(app.state().chats.get(0).unwrap().messages.len(), 4);

            // gateway queue is exhausted, so this one falls back
            run_send(&mut app, "third", None).await.unwrap();
            assert_eq!(app.state().chats.len(), 2);
            assert_eq!(
                app.state().chats.get(0).unwrap().preview,
                DEFAULT_FALLBACK_MESSAGE
            );
        }
    }
}

//! Special commands parser for interactive chat mode
//!
//! This module parses the slash commands that can be entered during an
//! interactive chat session. Special commands allow users to:
//! - Start, list, search, open, rename and delete chats
//! - Create, rename, delete and browse folders
//! - Export or share the active chat
//! - Display help information and exit the session
//!
//! Command names are case-insensitive; their arguments keep their case.
//! Positions are 1-based, as shown in the listings.

use crate::models::FolderColor;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands act on the chat and folder lists rather than being sent
/// to the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Drop the selection so the next message starts a new chat
    NewChat,

    /// Show the chat list
    ListChats,

    /// Show chats whose title or preview contains the text
    Search(String),

    /// Make the chat at this position active and print it
    Open(usize),

    /// Rename the active chat
    Rename(String),

    /// Delete the active chat
    Delete,

    /// Show the folder list
    ListFolders,

    /// Create a folder
    CreateFolder { name: String, color: FolderColor },

    /// Rename the folder at a position
    RenameFolder { position: usize, name: String },

    /// Delete the folder at a position
    DeleteFolder(usize),

    /// Show the chats of the folder at a position
    ShowFolder(usize),

    /// Add the active chat to the folder at a position
    MoveToFolder(usize),

    /// Export the active chat, optionally to a given path
    Export(Option<String>),

    /// Print the share transcript of the active chat
    Share,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent as a chat message.
    None,
}

/// Parse a user input string into a special command
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None for
/// regular messages.
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is not a valid command.
/// Returns CommandError::UnsupportedArgument if a command receives an invalid argument.
/// Returns CommandError::MissingArgument if a command requires an argument but none was provided.
///
/// # Examples
///
/// ```
/// use studybuddy::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/open 2").unwrap(), SpecialCommand::Open(2));
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') {
        return Ok(match lower.as_str() {
            "exit" | "quit" => SpecialCommand::Exit,
            _ => SpecialCommand::None,
        });
    }

    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    match name.as_str() {
        "/new" => no_argument("/new", rest, SpecialCommand::NewChat),
        "/list" | "/chats" => no_argument("/list", rest, SpecialCommand::ListChats),
        "/search" => required(rest, "/search", "/search <text>")
            .map(|q| SpecialCommand::Search(q.to_string())),
        "/open" => Ok(SpecialCommand::Open(position(
            required(rest, "/open", "/open <n>")?,
            "/open",
        )?)),
        "/rename" => required(rest, "/rename", "/rename <title>")
            .map(|t| SpecialCommand::Rename(t.to_string())),
        "/delete" => no_argument("/delete", rest, SpecialCommand::Delete),
        "/folders" => no_argument("/folders", rest, SpecialCommand::ListFolders),
        "/folder" => parse_folder_command(rest),
        "/move" => Ok(SpecialCommand::MoveToFolder(position(
            required(rest, "/move", "/move <folder n>")?,
            "/move",
        )?)),
        "/export" => Ok(SpecialCommand::Export(
            (!rest.is_empty()).then(|| rest.to_string()),
        )),
        "/share" => no_argument("/share", rest, SpecialCommand::Share),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn parse_folder_command(rest: &str) -> Result<SpecialCommand, CommandError> {
    const USAGE: &str = "/folder <new|rename|delete|show> ...";

    let (sub, args) = match rest.split_once(char::is_whitespace) {
        Some((sub, args)) => (sub.to_lowercase(), args.trim()),
        None => (rest.to_lowercase(), ""),
    };

    match sub.as_str() {
        "" => Err(CommandError::MissingArgument {
            command: "/folder".to_string(),
            usage: USAGE.to_string(),
        }),
        "new" | "create" => {
            let args = required(args, "/folder new", "/folder new <name> [color]")?;
            // A trailing palette word is the color, unless it is the whole name
            let (name, color) = match args.rsplit_once(char::is_whitespace) {
                Some((name, last)) => match FolderColor::parse_str(last) {
                    Ok(color) => (name.trim(), color),
                    Err(_) => (args, FolderColor::default()),
                },
                None => (args, FolderColor::default()),
            };
            Ok(SpecialCommand::CreateFolder {
                name: name.to_string(),
                color,
            })
        }
        "rename" => {
            let usage = "/folder rename <n> <name>";
            let args = required(args, "/folder rename", usage)?;
            let (n, name) = args
                .split_once(char::is_whitespace)
                .ok_or_else(|| CommandError::MissingArgument {
                    command: "/folder rename".to_string(),
                    usage: usage.to_string(),
                })?;
            Ok(SpecialCommand::RenameFolder {
                position: position(n, "/folder rename")?,
                name: name.trim().to_string(),
            })
        }
        "delete" => Ok(SpecialCommand::DeleteFolder(position(
            required(args, "/folder delete", "/folder delete <n>")?,
            "/folder delete",
        )?)),
        "show" => Ok(SpecialCommand::ShowFolder(position(
            required(args, "/folder show", "/folder show <n>")?,
            "/folder show",
        )?)),
        other => Err(CommandError::UnsupportedArgument {
            command: "/folder".to_string(),
            arg: other.to_string(),
        }),
    }
}

fn required<'a>(rest: &'a str, command: &str, usage: &str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        })
    } else {
        Ok(rest)
    }
}

fn no_argument(
    command: &str,
    rest: &str,
    parsed: SpecialCommand,
) -> Result<SpecialCommand, CommandError> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: rest.to_string(),
        })
    }
}

fn position(arg: &str, command: &str) -> Result<usize, CommandError> {
    match arg.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        }),
    }
}

/// Print the special command reference
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

CHATS:
  /new                     - Start a new chat with your next message
  /list                    - List all chats (* marks the active one)
  /search <text>           - List chats whose title or preview matches
  /open <n>                - Open chat n and print its messages
  /rename <title>          - Rename the active chat
  /delete                  - Delete the active chat

FOLDERS:
  /folders                 - List folders
  /folder new <name> [color]  - Create a folder (blue, green, purple, orange, red, pink)
  /folder rename <n> <name>   - Rename folder n
  /folder delete <n>       - Delete folder n (its chats are kept)
  /folder show <n>         - List the chats in folder n
  /move <n>                - Add the active chat to folder n

SHARING:
  /export [path]           - Export the active chat to a JSON file
  /share                   - Print the active chat as plain text

OTHER:
  /help, /?                - Show this help
  exit, quit               - Leave the session

Anything else is sent to StudyBuddy as a message.
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regular_text_returns_none() {
        assert_eq!(
            parse_special_command("what is a derivative?").unwrap(),
            SpecialCommand::None
        );
        assert_eq!(parse_special_command("").unwrap(), SpecialCommand::None);
    }

    #[test]
    fn test_parse_exit_variants() {
        for input in ["exit", "QUIT", "/exit", "/quit"] {
            assert_eq!(parse_special_command(input).unwrap(), SpecialCommand::Exit);
        }
    }

    #[test]
    fn test_parse_help() {
        assert_eq!(parse_special_command("/help").unwrap(), SpecialCommand::Help);
        assert_eq!(parse_special_command("/?").unwrap(), SpecialCommand::Help);
    }

    #[test]
    fn test_parse_case_insensitive_name_keeps_argument_case() {
        assert_eq!(
            parse_special_command("/RENAME Newton's Laws").unwrap(),
            SpecialCommand::Rename("Newton's Laws".to_string())
        );
        assert_eq!(
            parse_special_command("/Search Gravity").unwrap(),
            SpecialCommand::Search("Gravity".to_string())
        );
    }

    #[test]
    fn test_parse_open_position() {
        assert_eq!(parse_special_command("/open 3").unwrap(), SpecialCommand::Open(3));
        assert!(matches!(
            parse_special_command("/open 0"),
            Err(CommandError::UnsupportedArgument { .. })
        ));
        assert!(matches!(
            parse_special_command("/open first"),
            Err(CommandError::UnsupportedArgument { .. })
        ));
        assert!(matches!(
            parse_special_command("/open"),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_parse_no_argument_commands_reject_extras() {
        assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewChat);
        assert_eq!(parse_special_command("/delete").unwrap(), SpecialCommand::Delete);
        assert!(matches!(
            parse_special_command("/delete 2"),
            Err(CommandError::UnsupportedArgument { .. })
        ));
    }

    #[test]
    fn test_parse_folder_new_with_and_without_color() {
        assert_eq!(
            parse_special_command("/folder new Linear Algebra green").unwrap(),
            SpecialCommand::CreateFolder {
                name: "Linear Algebra".to_string(),
                color: FolderColor::Green,
            }
        );
        assert_eq!(
            parse_special_command("/folder new Linear Algebra").unwrap(),
            SpecialCommand::CreateFolder {
                name: "Linear Algebra".to_string(),
                color: FolderColor::Blue,
            }
        );
        // a lone color word is a name
        assert_eq!(
            parse_special_command("/folder new Red").unwrap(),
            SpecialCommand::CreateFolder {
                name: "Red".to_string(),
                color: FolderColor::Blue,
            }
        );
    }

    #[test]
    fn test_parse_folder_rename_delete_show() {
        assert_eq!(
            parse_special_command("/folder rename 2 Calculus II").unwrap(),
            SpecialCommand::RenameFolder {
                position: 2,
                name: "Calculus II".to_string(),
            }
        );
        assert_eq!(
            parse_special_command("/folder delete 1").unwrap(),
            SpecialCommand::DeleteFolder(1)
        );
        assert_eq!(
            parse_special_command("/folder show 4").unwrap(),
            SpecialCommand::ShowFolder(4)
        );
        assert!(matches!(
            parse_special_command("/folder rename 2"),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_parse_folder_errors() {
        assert!(matches!(
            parse_special_command("/folder"),
            Err(CommandError::MissingArgument { .. })
        ));
        assert!(matches!(
            parse_special_command("/folder paint 1"),
            Err(CommandError::UnsupportedArgument { .. })
        ));
    }

    #[test]
    fn test_parse_move_export_share() {
        assert_eq!(
            parse_special_command("/move 1").unwrap(),
            SpecialCommand::MoveToFolder(1)
        );
        assert_eq!(
            parse_special_command("/export").unwrap(),
            SpecialCommand::Export(None)
        );
        assert_eq!(
            parse_special_command("/export notes/gravity.json").unwrap(),
            SpecialCommand::Export(Some("notes/gravity.json".to_string()))
        );
        assert_eq!(parse_special_command("/share").unwrap(), SpecialCommand::Share);
    }

    #[test]
    fn test_parse_unknown_command_returns_error() {
        let err = parse_special_command("/teleport").unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("/teleport".to_string()));
        assert!(err.to_string().contains("/help"));
    }
}

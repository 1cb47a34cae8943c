//! Command-line interface definition for StudyBuddy
//!
//! This module defines the CLI structure using clap's derive API. Chats and
//! folders are addressed by their 1-based position in the listings.

use crate::models::FolderColor;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// StudyBuddy - terminal front end for the study assistant
///
/// Keeps chat sessions and folders in a local database and forwards your
/// messages to the study assistant backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "studybuddy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Directory holding the chat database
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Override the chat backend endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for StudyBuddy
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Continue the chat at this position instead of starting a new one
        #[arg(short, long)]
        resume: Option<usize>,
    },

    /// Send a single message and print the reply
    Send {
        /// Message text
        message: String,

        /// Send in the chat at this position instead of starting a new one
        #[arg(long)]
        chat: Option<usize>,
    },

    /// List chats
    List {
        /// Only chats whose title or preview contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only chats in this folder (name or position)
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Print the transcript of a chat
    Show {
        /// Chat position
        index: usize,
    },

    /// Rename a chat
    Rename {
        /// Chat position
        index: usize,

        /// New title
        title: String,
    },

    /// Delete a chat
    Delete {
        /// Chat position
        index: usize,
    },

    /// Manage folders
    Folder {
        /// Folder subcommand
        #[command(subcommand)]
        command: FolderCommand,
    },

    /// Export chats to a JSON file
    Export {
        /// Export only the chat at this position
        #[arg(long)]
        chat: Option<usize>,

        /// Output file; defaults to a generated name in the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import chats and folders from a JSON export
    Import {
        /// Export file to read
        path: PathBuf,
    },

    /// Delete every chat and folder
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Folder management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FolderCommand {
    /// Create a folder
    Create {
        /// Folder name
        name: String,

        /// Folder color (blue, green, purple, orange, red, pink)
        #[arg(short, long, default_value = "blue", value_parser = FolderColor::parse_str)]
        color: FolderColor,
    },

    /// Rename a folder
    Rename {
        /// Folder name or position
        folder: String,

        /// New name
        name: String,
    },

    /// Delete a folder (its chats are kept)
    Delete {
        /// Folder name or position
        folder: String,
    },

    /// Add a chat to a folder
    Add {
        /// Folder name or position
        folder: String,

        /// Chat position
        chat: usize,
    },

    /// List folders
    List,
}

impl Cli {
    /// Parse command-line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            data_dir: None,
            endpoint: None,
            verbose: false,
            command: Commands::Chat { resume: None },
        }
    }
}

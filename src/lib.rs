//! StudyBuddy - terminal front end for the study assistant
//!
//! This library keeps chat sessions and folders in memory, persists them to a
//! local key-value store after every change, and forwards user messages to an
//! HTTP chat backend.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `models`: Chat session, message and folder records
//! - `chats` / `folders`: In-memory stores and their mutations
//! - `transfer`: JSON export and import
//! - `storage`: Persistence adapter over sled
//! - `gateway`: Reply backend abstraction and HTTP implementation
//! - `state`: Application state and the per-chat reply state machine
//! - `app`: Orchestrator that flushes to storage after each mutation
//! - `render`: List projection, filtering and terminal rendering
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and handlers
//!
//! # Example
//!
//! ```no_run
//! use studybuddy::{App, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let mut app = App::open(&config)?;
//!     if let Some(reply) = app.send_message("Explain gravity").await? {
//!         println!("{}", reply.text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod chats;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod folders;
pub mod gateway;
pub mod models;
pub mod render;
pub mod state;
pub mod storage;
pub mod transfer;

// Re-export commonly used types
pub use app::App;
pub use config::Config;
pub use error::{Result, StudyBuddyError};
pub use gateway::{HttpReplyGateway, ReplyGateway};
pub use models::{ChatMessage, ChatSession, Folder, FolderColor, Role};
pub use state::{AppState, DeliveredReply, ReplyState};

#[cfg(test)]
pub mod test_utils;

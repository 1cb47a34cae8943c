//! Configuration management for StudyBuddy
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::chats::{TextLimits, DEFAULT_PREVIEW_MAX_CHARS, DEFAULT_TITLE_MAX_CHARS};
use crate::error::{Result, StudyBuddyError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for StudyBuddy
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Reply backend settings
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Local persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Chat text handling
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Reply backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Full URL of the chat endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds; no timeout when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000/chat".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: None,
        }
    }
}

/// Local persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory holding the database; platform data dir when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Chat text configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Characters kept in generated titles
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,

    /// Characters kept in previews
    #[serde(default = "default_preview_max_chars")]
    pub preview_max_chars: usize,

    /// Bot message appended when the backend cannot be reached
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

fn default_title_max_chars() -> usize {
    DEFAULT_TITLE_MAX_CHARS
}

fn default_preview_max_chars() -> usize {
    DEFAULT_PREVIEW_MAX_CHARS
}

/// Fallback bot message used when the backend cannot be reached
pub const DEFAULT_FALLBACK_MESSAGE: &str = "I'm having trouble connecting to the server. Please make sure the backend is running on http://127.0.0.1:8000";

fn default_fallback_message() -> String {
    DEFAULT_FALLBACK_MESSAGE.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            title_max_chars: default_title_max_chars(),
            preview_max_chars: default_preview_max_chars(),
            fallback_message: default_fallback_message(),
        }
    }
}

impl ChatConfig {
    /// Title and preview limits for the chat store
    pub fn text_limits(&self) -> TextLimits {
        TextLimits {
            title_max_chars: self.title_max_chars,
            preview_max_chars: self.preview_max_chars,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StudyBuddyError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| StudyBuddyError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(endpoint) = std::env::var("STUDYBUDDY_ENDPOINT") {
            self.gateway.endpoint = endpoint;
        }

        if let Ok(timeout) = std::env::var("STUDYBUDDY_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.gateway.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid STUDYBUDDY_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(data_dir) = std::env::var("STUDYBUDDY_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(data_dir));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(endpoint) = &cli.endpoint {
            tracing::debug!("Endpoint override from CLI: {}", endpoint);
            self.gateway.endpoint = endpoint.clone();
        }

        if let Some(data_dir) = &cli.data_dir {
            tracing::debug!("Data dir override from CLI: {}", data_dir.display());
            self.storage.data_dir = Some(data_dir.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::Config` if any check fails
    pub fn validate(&self) -> Result<()> {
        let endpoint = url::Url::parse(&self.gateway.endpoint).map_err(|e| {
            StudyBuddyError::Config(format!(
                "Invalid gateway.endpoint {}: {}",
                self.gateway.endpoint, e
            ))
        })?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(StudyBuddyError::Config(format!(
                "gateway.endpoint must use http or https, got {}",
                endpoint.scheme()
            ))
            .into());
        }

        if self.gateway.timeout_seconds == Some(0) {
            return Err(StudyBuddyError::Config(
                "gateway.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.title_max_chars == 0 {
            return Err(StudyBuddyError::Config(
                "chat.title_max_chars must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.preview_max_chars == 0 {
            return Err(StudyBuddyError::Config(
                "chat.preview_max_chars must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.fallback_message.trim().is_empty() {
            return Err(StudyBuddyError::Config(
                "chat.fallback_message cannot be empty".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Directory holding the database
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::Storage` if no data dir is configured and
    /// the platform one cannot be determined
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => crate::storage::default_data_dir(),
        }
    }
}

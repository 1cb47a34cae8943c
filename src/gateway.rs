//! Remote reply gateway
//!
//! Posts the latest user message to the chat backend and returns its reply.
//! Every failure (transport, non-2xx status, undecodable body) is reported as
//! `StudyBuddyError::Network`. There is exactly one attempt per call.

use crate::config::GatewayConfig;
use crate::error::{Result, StudyBuddyError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Source of bot replies
#[async_trait]
pub trait ReplyGateway: Send + Sync {
    /// Send `message` and return the reply text
    ///
    /// # Errors
    ///
    /// Returns `StudyBuddyError::Network` if no reply could be obtained
    async fn send(&self, message: &str) -> Result<String>;
}

/// Request body for the chat endpoint
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Response body from the chat endpoint
#[derive(Debug, Deserialize)]
struct ChatResponse {
    reply: String,
}

/// Gateway that POSTs `{"message": ...}` to an HTTP endpoint
///
/// # Examples
///
/// ```
/// use studybuddy::config::GatewayConfig;
/// use studybuddy::gateway::HttpReplyGateway;
///
/// let gateway = HttpReplyGateway::new(&GatewayConfig::default()).unwrap();
/// assert_eq!(gateway.endpoint(), "http://127.0.0.1:8000/chat");
/// ```
pub struct HttpReplyGateway {
    client: Client,
    endpoint: String,
}

impl HttpReplyGateway {
    /// Create a gateway for the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("studybuddy/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| StudyBuddyError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized reply gateway: endpoint={}", config.endpoint);

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// The endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReplyGateway for HttpReplyGateway {
    async fn send(&self, message: &str) -> Result<String> {
        tracing::debug!("Sending chat request: {} chars", message.chars().count());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Chat request failed: {}", e);
                StudyBuddyError::Network(format!("Chat request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Chat backend returned error {}: {}", status, error_text);
            return Err(StudyBuddyError::Network(format!(
                "Chat backend returned error {}",
                status
            ))
            .into());
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse chat response: {}", e);
            StudyBuddyError::Network(format!("Failed to parse chat response: {}", e))
        })?;

        Ok(body.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(ChatRequest { message: "hi" }).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "hi" }));
    }

    #[test]
    fn test_new_with_timeout() {
        let config = GatewayConfig {
            endpoint: "http://localhost:1/chat".to_string(),
            timeout_seconds: Some(5),
        };
        let gateway = HttpReplyGateway::new(&config).unwrap();
        assert_eq!(gateway.endpoint(), "http://localhost:1/chat");
    }
}

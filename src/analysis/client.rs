//! Completion-service client
//!
//! The engine talks to the completion service through the
//! [`CompletionClient`] trait so any model meeting the contract is
//! substitutable; the shipped implementation uses the Anthropic Messages
//! API with an `ANTHROPIC_API_KEY` from the environment.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::config::AnalysisConfig;
use crate::core::error::{Error, Result};

/// Messages API endpoint
const API_URL: &str = "https://api.anthropic.com/v1/messages";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Global HTTP client with connection pooling (reused across all requests)
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_nodelay(true)
        .connect_timeout(Duration::from_secs(2))
        .build()
        .expect("Failed to build HTTP client")
});

/// Capability handle to the external completion service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a system instruction and user prompt, returning the raw reply
    /// text.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Anthropic Messages API client.
pub struct AnthropicClient {
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl AnthropicClient {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn api_key() -> Result<String> {
        std::env::var("ANTHROPIC_API_KEY").map_err(|_| Error::CompletionError {
            message: "ANTHROPIC_API_KEY is not set".to_string(),
        })
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let api_key = Self::api_key()?;

        let request = MessageRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: user,
            }],
        };

        debug!(model = %self.model, "Sending completion request");

        let response = HTTP_CLIENT
            .post(API_URL)
            .timeout(self.timeout)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(%status, "Completion API error");
            return Err(Error::CompletionError {
                message: format!("Completion API error: {} - {}", status, text),
            });
        }

        let response: MessageResponse = response.json().await?;

        let text = response
            .content
            .into_iter()
            .filter_map(|block| (block.content_type == "text").then_some(block.text))
            .collect::<Vec<_>>()
            .join("");

        debug!(chars = text.len(), "Received completion response");
        Ok(text)
    }
}

/// Message request to the Messages API
#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

/// A single message in the conversation
#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the Messages API
#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

/// Content block in response
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

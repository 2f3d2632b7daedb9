//! Groq chat-completions client
//!
//! Groq exposes an OpenAI-compatible API, so the request/response shapes
//! follow the chat completions schema. The agent is treated as an opaque
//! remote service: one text prompt in, one markdown summary out.

use crate::error::{AgentError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

const SYSTEM_PROMPT: &str = "You are a financial analysis assistant. \
Summarize analyst recommendations and recent news for the requested stock. \
Use tables to show data and always include the sources of the news. \
If some information is unavailable, continue with what you have.";

/// Configuration for the Groq agent client
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL (default: Groq's OpenAI-compatible endpoint)
    pub api_base: String,

    /// Model identifier
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GroqConfig {
    /// Create a new config with the given API key and defaults
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables.
    ///
    /// Reads the key from `GROQ_API_KEY`; `GROQ_API_BASE` and `GROQ_MODEL`
    /// override the defaults when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| {
            AgentError::Configuration("GROQ_API_KEY environment variable not set".to_string())
        })?;

        let mut config = Self::new(api_key);
        if let Ok(base) = std::env::var("GROQ_API_BASE") {
            config.api_base = base;
        }
        if let Ok(model) = std::env::var("GROQ_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    /// Set a custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Client for the remote summarization agent
pub struct GroqClient {
    client: Client,
    config: GroqConfig,
}

impl GroqClient {
    /// Create a client with custom configuration
    pub fn with_config(config: GroqConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(GroqConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &GroqConfig {
        &self.config
    }

    /// The prompt sent for one ticker's analysis
    pub fn analysis_prompt(ticker: &str) -> String {
        format!(
            "Summarize the analyst recommendation and share the latest news for {ticker}"
        )
    }

    /// Ask the agent to summarize recommendations and news for `ticker`.
    ///
    /// Returns the raw markdown text; callers usually pass it through
    /// [`crate::sanitize::strip_tool_chatter`] before display.
    pub async fn summarize(&self, ticker: &str) -> Result<String> {
        self.complete(&Self::analysis_prompt(ticker)).await
    }

    /// Send a single-turn completion request
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(api_base = %self.config.api_base, model = %self.config.model, "Sending agent request");

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 => AgentError::AuthenticationFailed,
                429 => AgentError::RateLimitExceeded(error_text),
                400 => AgentError::InvalidRequest(error_text),
                _ => AgentError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            AgentError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AgentError::UnexpectedResponse("No choices in response".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

//! LLM Pool: model routing over the Anthropic client.
//!
//! Wraps AnthropicClient with model aliasing and default model selection.
//! The crew's `LlmAgentRuntime` uses this for every agent turn.

pub mod client;
pub mod types;

use client::{AnthropicClient, LlmError};
use types::{resolve_model, Message, MessagesRequest, MessagesResponse, ToolDefinition};

use crate::config::LlmConfig;

/// LLM connection pool with model routing.
#[derive(Debug)]
pub struct LlmPool {
    client: AnthropicClient,
    default_model: String,
}

impl LlmPool {
    /// Create a pool with an explicit API key and default model.
    pub fn new(api_key: String, default_model: &str) -> Self {
        Self {
            client: AnthropicClient::new(api_key),
            default_model: resolve_model(default_model).to_string(),
        }
    }

    /// Create a pool with a custom base URL.
    pub fn with_base_url(api_key: String, default_model: &str, base_url: String) -> Self {
        Self {
            client: AnthropicClient::with_base_url(api_key, base_url),
            default_model: resolve_model(default_model).to_string(),
        }
    }

    /// Build from the `llm` config section. A non-empty key in the config
    /// wins over the environment.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let configured = config.api_key.as_deref().filter(|key| !key.trim().is_empty());
        let api_key = match configured {
            Some(key) => key.to_string(),
            None => std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
                LlmError::MissingApiKey(
                    "set llm.api_key or the ANTHROPIC_API_KEY environment variable".into(),
                )
            })?,
        };
        Ok(match &config.base_url {
            Some(url) => Self::with_base_url(api_key, &config.model, url.clone()),
            None => Self::new(api_key, &config.model),
        })
    }

    /// Send a completion request with tool definitions.
    ///
    /// - `model`: None means use default model, Some("alias") resolves aliases.
    /// - `system`: Optional system prompt.
    /// - `tools`: An empty list leaves the `tools` field out of the request.
    pub async fn complete_with_tools(
        &self,
        model: Option<&str>,
        messages: Vec<Message>,
        max_tokens: u32,
        system: Option<&str>,
        tools: Vec<ToolDefinition>,
    ) -> Result<MessagesResponse, LlmError> {
        let resolved_model = model
            .map(|m| resolve_model(m).to_string())
            .unwrap_or_else(|| self.default_model.clone());

        let request = MessagesRequest {
            model: resolved_model,
            max_tokens,
            messages,
            system: system.map(|s| s.to_string()),
            temperature: None,
            tools: if tools.is_empty() { None } else { Some(tools) },
        };

        self.client.messages(&request).await
    }

    /// Get the default model (resolved to full ID).
    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

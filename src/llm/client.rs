//! Raw HTTP client for the Anthropic Messages API.
//!
//! No crew awareness. It makes API calls via reqwest and rejects replies
//! the tool loop could not act on.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::types::{MessagesRequest, MessagesResponse};

/// Error envelope returned by the API on non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// Errors from LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("rate limited (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("missing API key: {0}")]
    MissingApiKey(String),
}

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Raw HTTP client for the Anthropic Messages API.
#[derive(Debug)]
pub struct AnthropicClient {
    http: Client,
    api_key: String,
    base_url: String,
    api_version: String,
}

impl AnthropicClient {
    /// Create a client with default base URL (https://api.anthropic.com).
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.into())
    }

    /// Create a client with a custom base URL (proxies, test stubs).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: "2023-06-01".into(),
        }
    }

    /// Send a messages request to the Anthropic API.
    pub async fn messages(&self, request: &MessagesRequest) -> Result<MessagesResponse, LlmError> {
        let url = format!("{}/v1/messages", self.base_url);
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "messages request"
        );

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(LlmError::RateLimited { retry_after });
        }

        if status >= 400 {
            let body = response.text().await.unwrap_or_else(|_| "(no body)".into());
            return Err(LlmError::ApiError {
                status,
                message: error_message(&body),
            });
        }

        let resp: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {e}")))?;

        if resp.stop_reason.as_deref() == Some("tool_use") && resp.tool_calls().is_empty() {
            return Err(LlmError::InvalidResponse(
                "stop_reason is tool_use but the reply has no tool_use blocks".into(),
            ));
        }

        Ok(resp)
    }
}

/// `"<type>: <message>"` from the API's error envelope, or the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => format!("{}: {}", parsed.error.kind, parsed.error.message),
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::Message;
    use crate::test_support::StubServer;

    fn hello_request() -> MessagesRequest {
        MessagesRequest {
            model: "claude-opus-4-20250514".into(),
            max_tokens: 1024,
            messages: vec![Message::user("Hello")],
            system: None,
            temperature: None,
            tools: None,
        }
    }

    #[test]
    fn client_creation() {
        let client = AnthropicClient::new("test-key".into());
        assert_eq!(client.base_url, "https://api.anthropic.com");
        assert_eq!(client.api_version, "2023-06-01");
    }

    #[test]
    fn client_custom_base_url() {
        let client =
            AnthropicClient::with_base_url("test-key".into(), "http://localhost:8080/".into());
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn messages_sends_auth_headers() {
        let server = StubServer::fixed(
            200,
            r#"{"id":"msg_1","model":"m","content":[{"type":"text","text":"hi"}],
                "stop_reason":"end_turn","usage":{"input_tokens":1,"output_tokens":1}}"#,
        )
        .await;
        let client = AnthropicClient::with_base_url("test-key".into(), server.url.clone());

        let resp = client.messages(&hello_request()).await.unwrap();
        assert_eq!(resp.text(), "hi");

        let requests = server.requests();
        assert_eq!(requests[0].path, "/v1/messages");
        assert_eq!(requests[0].header("x-api-key"), Some("test-key"));
        assert_eq!(requests[0].header("anthropic-version"), Some("2023-06-01"));
        assert_eq!(requests[0].json()["messages"][0]["content"], "Hello");
    }

    #[tokio::test]
    async fn rate_limit_is_reported() {
        let server = StubServer::fixed(429, "{}").await;
        let client = AnthropicClient::with_base_url("k".into(), server.url.clone());
        let err = client.messages(&hello_request()).await.unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn api_error_carries_body() {
        let server = StubServer::fixed(401, "invalid api key").await;
        let client = AnthropicClient::with_base_url("k".into(), server.url.clone());
        let err = client.messages(&hello_request()).await.unwrap_err();
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("invalid api key"));
    }

    #[tokio::test]
    async fn api_error_envelope_is_unwrapped() {
        let server = StubServer::fixed(
            400,
            r#"{"type":"error","error":{"type":"invalid_request_error","message":"tools.0: input_schema is required"}}"#,
        )
        .await;
        let client = AnthropicClient::with_base_url("k".into(), server.url.clone());
        let err = client.messages(&hello_request()).await.unwrap_err();
        match err {
            LlmError::ApiError { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(
                    message,
                    "invalid_request_error: tools.0: input_schema is required"
                );
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn tool_use_stop_without_calls_is_rejected() {
        let server = StubServer::fixed(
            200,
            r#"{"id":"msg_1","model":"m","content":[{"type":"text","text":"let me check"}],
                "stop_reason":"tool_use","usage":{"input_tokens":1,"output_tokens":1}}"#,
        )
        .await;
        let client = AnthropicClient::with_base_url("k".into(), server.url.clone());
        let err = client.messages(&hello_request()).await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(ref m) if m.contains("tool_use")));
    }

    #[tokio::test]
    async fn tool_definitions_are_sent() {
        let server = StubServer::fixed(
            200,
            r#"{"id":"msg_1","model":"m","content":[{"type":"tool_use","id":"toolu_1",
                "name":"execute_sql","input":{"sql":"SELECT 1"}}],
                "stop_reason":"tool_use","usage":{"input_tokens":1,"output_tokens":1}}"#,
        )
        .await;
        let client = AnthropicClient::with_base_url("k".into(), server.url.clone());
        let request = MessagesRequest {
            tools: Some(vec![crate::llm::types::ToolDefinition {
                name: "execute_sql".into(),
                description: "run sql".into(),
                input_schema: serde_json::json!({"type": "object"}),
            }]),
            ..hello_request()
        };

        let resp = client.messages(&request).await.unwrap();
        assert!(resp.wants_tools());
        assert_eq!(resp.tool_calls()[0].name, "execute_sql");
        assert_eq!(server.requests()[0].json()["tools"][0]["name"], "execute_sql");
    }

    #[test]
    fn error_display() {
        let err = LlmError::RateLimited {
            retry_after: Some(30),
        };
        assert!(err.to_string().contains("rate limited"));

        let err = LlmError::MissingApiKey("ANTHROPIC_API_KEY not set".into());
        assert!(err.to_string().contains("missing API key"));
    }
}

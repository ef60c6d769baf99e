//! Raw HTTP client for the schema/execution service.
//!
//! Two endpoints, one request per call. No retry, no timeout.

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use tracing::debug;

/// Errors from the remote service.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service error (status {status}) from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
}

/// Request body for `POST /execute/{database}`.
#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    sql: &'a str,
}

/// Client for the remote schema/execution service.
#[derive(Debug, Clone)]
pub struct McpClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl McpClient {
    /// Create a client. A trailing `/` on the base URL is dropped, and an
    /// empty key counts as no key.
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// `GET {base_url}/schema/{database}`.
    pub async fn get_schema(&self, database: &str) -> Result<serde_json::Value, McpError> {
        let url = self.endpoint("schema", database);
        debug!(%url, "fetching schema");
        let response = self.authorize(self.http.get(&url)).send().await?;
        read_json(url, response).await
    }

    /// `POST {base_url}/execute/{database}` with `{"sql": ...}`.
    pub async fn execute_sql(
        &self,
        database: &str,
        sql: &str,
    ) -> Result<serde_json::Value, McpError> {
        let url = self.endpoint("execute", database);
        debug!(%url, sql_len = sql.len(), "executing sql");
        let response = self
            .authorize(self.http.post(&url))
            .json(&ExecuteRequest { sql })
            .send()
            .await?;
        read_json(url, response).await
    }

    fn endpoint(&self, action: &str, database: &str) -> String {
        format!(
            "{}/{action}/{}",
            self.base_url,
            urlencoding::encode(database)
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

async fn read_json(url: String, response: Response) -> Result<serde_json::Value, McpError> {
    let status = response.status().as_u16();

    if status >= 400 {
        let body = response.text().await.unwrap_or_else(|_| "(no body)".into());
        return Err(McpError::Status { status, url, body });
    }

    response
        .json()
        .await
        .map_err(|e| McpError::InvalidResponse {
            url,
            message: format!("failed to parse response: {e}"),
        })
}

//! `execute_sql`: runs SQL on the target database through the remote service.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use crate::crew::{Tool, ToolError};
use crate::mcp::McpClient;

/// Input accepted by the tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteSqlInput {
    /// The SQL statement(s) to execute.
    pub sql: String,
}

/// Tool bound to one client and one database.
#[derive(Debug, Clone)]
pub struct ExecuteSqlTool {
    client: McpClient,
    database: String,
}

impl ExecuteSqlTool {
    pub fn new(client: McpClient, database: &str) -> Self {
        Self {
            client,
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl Tool for ExecuteSqlTool {
    fn name(&self) -> &str {
        "execute_sql"
    }

    fn description(&self) -> &str {
        "Execute SQL against the target database and return the result as JSON"
    }

    fn input_schema(&self) -> serde_json::Value {
        let schema = schemars::schema_for!(ExecuteSqlInput);
        let mut value = serde_json::to_value(schema)
            .unwrap_or_else(|_| serde_json::json!({"type": "object"}));
        if let Some(obj) = value.as_object_mut() {
            obj.remove("$schema");
        }
        value
    }

    async fn call(&self, input: serde_json::Value) -> Result<String, ToolError> {
        let input: ExecuteSqlInput = serde_json::from_value(input)?;
        debug!(database = %self.database, "execute_sql tool");
        let result = self.client.execute_sql(&self.database, &input.sql).await?;
        Ok(result.to_string())
    }
}

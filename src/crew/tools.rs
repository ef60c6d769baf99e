//! Tool framework: things an agent can call mid-task.
//!
//! Tools don't think, they execute. Each tool is self-documenting
//! (name, description, JSON input schema) so it can be advertised to the
//! model as-is.

use async_trait::async_trait;

use crate::llm::types::ToolDefinition;

/// Boxed error returned by a tool call.
pub type ToolError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON schema for the tool's input object.
    fn input_schema(&self) -> serde_json::Value;

    /// Run the tool. The returned text goes back to the model verbatim.
    async fn call(&self, input: serde_json::Value) -> Result<String, ToolError>;

    /// The definition sent to the Messages API.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

//! Agent runtimes: what actually performs a task.
//!
//! `LlmAgentRuntime` runs one agent turn against the Messages API and
//! services tool calls until the model produces a final answer.

use async_trait::async_trait;
use tracing::{debug, info};

use super::agent::{Agent, Task};
use super::{prompt, CrewError, Upstream};
use crate::llm::types::{ContentBlock, Message};
use crate::llm::LlmPool;

/// Performs a single task for a single agent.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn perform(
        &self,
        agent: &Agent,
        task: &Task,
        upstream: &[Upstream<'_>],
    ) -> Result<String, CrewError>;
}

/// Production runtime backed by an LLM pool.
#[derive(Debug)]
pub struct LlmAgentRuntime {
    pool: LlmPool,
    max_tokens: u32,
    max_tool_rounds: usize,
}

impl LlmAgentRuntime {
    pub fn new(pool: LlmPool, max_tokens: u32, max_tool_rounds: usize) -> Self {
        Self {
            pool,
            max_tokens,
            max_tool_rounds,
        }
    }
}

#[async_trait]
impl AgentRuntime for LlmAgentRuntime {
    async fn perform(
        &self,
        agent: &Agent,
        task: &Task,
        upstream: &[Upstream<'_>],
    ) -> Result<String, CrewError> {
        let system = prompt::build_system_prompt(agent);
        let tools = agent.tool_definitions();
        let mut messages = vec![Message::user(prompt::build_task_prompt(
            agent, task, upstream,
        ))];
        let mut rounds = 0;

        loop {
            let response = self
                .pool
                .complete_with_tools(
                    None,
                    messages.clone(),
                    self.max_tokens,
                    Some(&system),
                    tools.clone(),
                )
                .await?;

            debug!(
                agent = %agent.name,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                stop_reason = response.stop_reason.as_deref().unwrap_or("unknown"),
                "llm turn"
            );

            if !response.wants_tools() {
                return Ok(response.text());
            }
            if rounds == self.max_tool_rounds {
                return Err(CrewError::ToolLoopExhausted {
                    agent: agent.name.clone(),
                    rounds,
                });
            }
            rounds += 1;

            let mut results = Vec::new();
            for call in response.tool_calls() {
                let tool = agent.tool(call.name).ok_or_else(|| CrewError::UnknownTool {
                    agent: agent.name.clone(),
                    tool: call.name.to_string(),
                })?;
                info!(agent = %agent.name, tool = call.name, "tool call");
                let output = tool
                    .call(call.input.clone())
                    .await
                    .map_err(|source| CrewError::Tool {
                        tool: call.name.to_string(),
                        source,
                    })?;
                results.push(ContentBlock::ToolResult {
                    tool_use_id: call.id.to_string(),
                    content: output,
                    is_error: false,
                });
            }

            messages.push(Message::assistant(response.replayable_content()));
            messages.push(Message::tool_results(results));
        }
    }
}

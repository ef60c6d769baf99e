//! Agents and tasks, the declarative half of a crew.

use std::fmt;
use std::sync::Arc;

use super::tools::Tool;
use crate::llm::types::ToolDefinition;

/// An agent persona with its own inputs and tools.
#[derive(Clone)]
pub struct Agent {
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    /// Named inputs, rendered into the task prompt in this order.
    pub inputs: Vec<(String, serde_json::Value)>,
    pub tools: Vec<Arc<dyn Tool>>,
}

impl Agent {
    pub fn new(name: &str, role: &str, goal: &str, backstory: &str) -> Self {
        Self {
            name: name.to_string(),
            role: role.to_string(),
            goal: goal.to_string(),
            backstory: backstory.to_string(),
            inputs: Vec::new(),
            tools: Vec::new(),
        }
    }

    pub fn with_input(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.inputs.push((key.to_string(), value.into()));
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn input(&self, key: &str) -> Option<&serde_json::Value> {
        self.inputs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("inputs", &self.inputs.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// Identity of a task within a crew.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A unit of work assigned to one agent.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub agent: Agent,
    pub depends_on: Vec<TaskId>,
}

impl Task {
    pub fn new(id: &str, description: &str, agent: Agent) -> Self {
        Self {
            id: TaskId::new(id),
            description: description.to_string(),
            agent,
            depends_on: Vec::new(),
        }
    }

    /// Declare that this task needs `other`'s result first.
    pub fn depends_on(mut self, other: &TaskId) -> Self {
        self.depends_on.push(other.clone());
        self
    }
}

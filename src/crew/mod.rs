//! Crew: a small multi-agent task runner.
//!
//! Tasks declare which other tasks they depend on. `kickoff` validates the
//! graph, then runs tasks one at a time in dependency order, feeding each
//! task the results of its direct dependencies. The first failure stops
//! the crew; nothing downstream of it runs.
//!
//! ## Architecture
//!
//! - `agent`: Agent personas, task ids and task declarations
//! - `tools`: Tool trait (self-documenting callable for the model)
//! - `prompt`: System and task prompt assembly
//! - `runtime`: AgentRuntime trait and the LLM-backed implementation

pub mod agent;
pub mod prompt;
pub mod runtime;
pub mod tools;

use std::collections::HashSet;

use tracing::{info, info_span, Instrument};

pub use agent::{Agent, Task, TaskId};
pub use runtime::{AgentRuntime, LlmAgentRuntime};
pub use tools::{Tool, ToolError};

use crate::llm::client::LlmError;

/// Errors from crew validation and execution.
#[derive(Debug, thiserror::Error)]
pub enum CrewError {
    #[error("duplicate task id '{0}'")]
    DuplicateTask(TaskId),

    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: TaskId, dependency: TaskId },

    #[error("dependency cycle among tasks: {}", format_ids(.0))]
    Cycle(Vec<TaskId>),

    #[error("task '{task}' failed: {source}")]
    TaskFailed {
        task: TaskId,
        #[source]
        source: Box<CrewError>,
    },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("agent '{agent}' requested unknown tool '{tool}'")]
    UnknownTool { agent: String, tool: String },

    #[error("tool '{tool}' failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolError,
    },

    #[error("agent '{agent}' still wanted tools after {rounds} rounds")]
    ToolLoopExhausted { agent: String, rounds: usize },
}

fn format_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(TaskId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The result of a dependency, as handed to a downstream task.
#[derive(Debug, Clone, Copy)]
pub struct Upstream<'a> {
    pub task: &'a TaskId,
    pub output: &'a str,
}

/// Results of a crew run, keyed by task id, in execution order.
#[derive(Debug, Clone, Default)]
pub struct CrewOutput {
    results: Vec<(TaskId, String)>,
}

impl CrewOutput {
    pub fn get(&self, id: &TaskId) -> Option<&str> {
        self.results
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn len(&self) -> usize {
        self.results.len()
    }

    fn insert(&mut self, id: TaskId, output: String) {
        self.results.push((id, output));
    }
}

/// A named set of tasks.
#[derive(Debug, Clone)]
pub struct Crew {
    name: String,
    tasks: Vec<Task>,
}

impl Crew {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tasks: Vec::new(),
        }
    }

    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Task indices in execution order.
    ///
    /// Stable topological order: among ready tasks, the one declared first
    /// runs first.
    pub fn execution_order(&self) -> Result<Vec<usize>, CrewError> {
        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(&task.id) {
                return Err(CrewError::DuplicateTask(task.id.clone()));
            }
        }
        for task in &self.tasks {
            if let Some(dep) = task.depends_on.iter().find(|d| !seen.contains(d)) {
                return Err(CrewError::UnknownDependency {
                    task: task.id.clone(),
                    dependency: dep.clone(),
                });
            }
        }

        let mut done: HashSet<&TaskId> = HashSet::new();
        let mut order = Vec::with_capacity(self.tasks.len());

        while order.len() < self.tasks.len() {
            let next = self.tasks.iter().enumerate().find(|(i, task)| {
                !order.contains(i) && task.depends_on.iter().all(|d| done.contains(d))
            });
            match next {
                Some((i, task)) => {
                    done.insert(&task.id);
                    order.push(i);
                }
                None => {
                    let stuck = self
                        .tasks
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| !order.contains(i))
                        .map(|(_, t)| t.id.clone())
                        .collect();
                    return Err(CrewError::Cycle(stuck));
                }
            }
        }

        Ok(order)
    }

    /// Run every task, in order, with the given runtime.
    pub async fn kickoff<R>(&self, runtime: &R) -> Result<CrewOutput, CrewError>
    where
        R: AgentRuntime + ?Sized,
    {
        let order = self.execution_order()?;
        info!(crew = %self.name, tasks = order.len(), "crew kickoff");

        let mut output = CrewOutput::default();
        for index in order {
            let task = &self.tasks[index];
            let upstream: Vec<Upstream<'_>> = task
                .depends_on
                .iter()
                .filter_map(|dep| output.get(dep).map(|out| Upstream { task: dep, output: out }))
                .collect();

            let span = info_span!("task", id = %task.id, agent = %task.agent.name);
            info!(parent: &span, "task started");
            let result = runtime
                .perform(&task.agent, task, &upstream)
                .instrument(span.clone())
                .await
                .map_err(|source| CrewError::TaskFailed {
                    task: task.id.clone(),
                    source: Box::new(source),
                })?;
            info!(parent: &span, chars = result.len(), "task finished");

            output.insert(task.id.clone(), result);
        }

        info!(crew = %self.name, results = output.len(), "crew finished");
        Ok(output)
    }
}

//! Prompt assembly for agent turns.
//!
//! The system prompt carries the persona. The user prompt carries the task,
//! the agent's inputs and the results of upstream tasks, each in its own
//! tagged block so the model can tell them apart.

use super::agent::{Agent, Task};
use super::Upstream;

/// Build the system prompt for an agent, with its tool list.
pub fn build_system_prompt(agent: &Agent) -> String {
    let mut prompt = format!(
        "You are {}, a {}.\n\nGoal: {}\n\nBackstory: {}",
        agent.name, agent.role, agent.goal, agent.backstory
    );

    if !agent.tools.is_empty() {
        prompt.push_str("\n\nAvailable tools:\n");
        for tool in &agent.tools {
            prompt.push_str(&format!("- **{}**: {}\n", tool.name(), tool.description()));
        }
    }

    prompt.push_str(
        "\n\nWhen the task is complete, reply with the final result only. \
         It is saved verbatim.",
    );
    prompt
}

/// Build the user prompt for one task.
pub fn build_task_prompt(agent: &Agent, task: &Task, upstream: &[Upstream<'_>]) -> String {
    let mut prompt = format!("Task: {}\n", task.description);

    let inputs: Vec<_> = agent.inputs.iter().filter(|(_, v)| !v.is_null()).collect();
    if !inputs.is_empty() {
        prompt.push_str("\nInputs:\n");
        for (key, value) in inputs {
            prompt.push_str(&format!(
                "<input name=\"{key}\">\n{}\n</input>\n",
                render_value(value)
            ));
        }
    }

    if !upstream.is_empty() {
        prompt.push_str("\nResults from earlier tasks:\n");
        for up in upstream {
            prompt.push_str(&format!(
                "<result task=\"{}\">\n{}\n</result>\n",
                up.task, up.output
            ));
        }
    }

    prompt
}

/// Strings go in raw; everything else as pretty JSON.
fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::agent::TaskId;

    fn analyst() -> Agent {
        Agent::new("Athena", "SQL Analyst", "find bottlenecks", "seasoned analyst")
    }

    #[test]
    fn system_prompt_has_persona() {
        let prompt = build_system_prompt(&analyst());
        assert!(prompt.starts_with("You are Athena, a SQL Analyst."));
        assert!(prompt.contains("Goal: find bottlenecks"));
        assert!(prompt.contains("Backstory: seasoned analyst"));
        assert!(!prompt.contains("Available tools"));
    }

    #[test]
    fn task_prompt_renders_inputs_and_upstream() {
        let agent = analyst()
            .with_input("sql_code", "SELECT * FROM t")
            .with_input("schema", serde_json::json!({"tables": ["t"]}))
            .with_input("recommendations", serde_json::Value::Null);
        let task = Task::new("implementation", "Rewrite it.", agent.clone());
        let analysis = TaskId::new("analysis");
        let upstream = [Upstream {
            task: &analysis,
            output: "add an index",
        }];

        let prompt = build_task_prompt(&agent, &task, &upstream);
        assert!(prompt.starts_with("Task: Rewrite it."));
        assert!(prompt.contains("<input name=\"sql_code\">\nSELECT * FROM t\n</input>"));
        assert!(prompt.contains("\"tables\""));
        // null inputs are skipped
        assert!(!prompt.contains("recommendations"));
        assert!(prompt.contains("<result task=\"analysis\">\nadd an index\n</result>"));
    }

    #[test]
    fn task_prompt_without_upstream() {
        let agent = analyst();
        let task = Task::new("analysis", "Analyze.", agent.clone());
        let prompt = build_task_prompt(&agent, &task, &[]);
        assert!(!prompt.contains("earlier tasks"));
        assert!(!prompt.contains("Inputs:"));
    }
}

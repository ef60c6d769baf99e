//! The SQL optimization crew: three agents, three tasks, one straight line.
//!
//! analysis (Athena) → implementation (Daedalus) → testing (Hermes)

pub mod execute_sql;
pub mod prompts;

use std::sync::Arc;

use crate::crew::{Agent, Crew, Task, TaskId, Tool};

pub use execute_sql::ExecuteSqlTool;

pub const ANALYSIS: &str = "analysis";
pub const IMPLEMENTATION: &str = "implementation";
pub const TESTING: &str = "testing";

/// Athena reads the schema and the procedure.
pub fn athena(schema: serde_json::Value, sql_code: &str) -> Agent {
    Agent::new(
        prompts::ATHENA_NAME,
        prompts::ATHENA_ROLE,
        prompts::ATHENA_GOAL,
        prompts::ATHENA_BACKSTORY,
    )
    .with_input("schema", schema)
    .with_input("sql_code", sql_code)
}

/// Daedalus gets the procedure; the recommendations arrive from the
/// analysis task.
pub fn daedalus(sql_code: &str) -> Agent {
    Agent::new(
        prompts::DAEDALUS_NAME,
        prompts::DAEDALUS_ROLE,
        prompts::DAEDALUS_GOAL,
        prompts::DAEDALUS_BACKSTORY,
    )
    .with_input("sql_code", sql_code)
}

/// Hermes gets the original procedure, the test queries and the database
/// config, and can run SQL. The rewrite arrives from the implementation task.
pub fn hermes(
    original_sql: &str,
    test_queries: Vec<String>,
    db_config: serde_json::Value,
    execute_sql: Arc<dyn Tool>,
) -> Agent {
    Agent::new(
        prompts::HERMES_NAME,
        prompts::HERMES_ROLE,
        prompts::HERMES_GOAL,
        prompts::HERMES_BACKSTORY,
    )
    .with_input("original_sql", original_sql)
    .with_input("test_queries", test_queries)
    .with_input("db_config", db_config)
    .with_tool(execute_sql)
}

/// Wire the three agents into the linear analyze → rewrite → test crew.
pub fn sql_optimization_crew(athena: Agent, daedalus: Agent, hermes: Agent) -> Crew {
    let analysis = Task::new(ANALYSIS, prompts::ANALYSIS_TASK, athena);
    let implementation =
        Task::new(IMPLEMENTATION, prompts::IMPLEMENTATION_TASK, daedalus).depends_on(&analysis.id);
    let testing = Task::new(TESTING, prompts::TESTING_TASK, hermes).depends_on(&implementation.id);

    Crew::new(prompts::CREW_NAME)
        .task(analysis)
        .task(implementation)
        .task(testing)
}

/// Ids of the three stages, in order.
pub fn stage_ids() -> [TaskId; 3] {
    [
        TaskId::new(ANALYSIS),
        TaskId::new(IMPLEMENTATION),
        TaskId::new(TESTING),
    ]
}

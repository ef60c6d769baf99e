//! Pipeline driver: inputs in, three reports out.
//!
//! 1. The caller discovers the procedure and test queries (no procedure
//!    means nothing else is touched)
//! 2. Fetch the schema from the remote service
//! 3. Build the crew and kick it off
//! 4. Write each stage's result verbatim to its fixed output file
//!
//! No retries. The first error ends the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::agents::{self, ExecuteSqlTool};
use crate::config::{Config, ConfigError};
use crate::crew::{AgentRuntime, CrewError, CrewOutput, LlmAgentRuntime, TaskId};
use crate::inputs::{InputError, SqlInputs};
use crate::llm::client::LlmError;
use crate::llm::LlmPool;
use crate::mcp::{McpClient, McpError};

pub const ANALYSIS_REPORT: &str = "analysis_report.txt";
pub const OPTIMIZED_PROCEDURE: &str = "optimized_procedure.sql";
pub const TEST_REPORT: &str = "test_report.txt";

/// Errors that end a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("remote service: {0}")]
    Mcp(#[from] McpError),

    #[error("LLM setup: {0}")]
    Llm(#[from] LlmError),

    #[error("crew: {0}")]
    Crew(#[from] CrewError),

    #[error("crew returned no result for task '{0}'")]
    MissingResult(TaskId),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// True when the run stopped because there was no procedure file.
    pub fn is_missing_procedure(&self) -> bool {
        matches!(self, PipelineError::Input(InputError::NoProcedure { .. }))
    }
}

/// Where inputs are read and outputs written.
#[derive(Debug, Clone)]
pub struct Layout {
    pub inputs_dir: PathBuf,
    pub outputs_dir: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            inputs_dir: PathBuf::from("inputs"),
            outputs_dir: PathBuf::from("outputs"),
        }
    }
}

/// Paths of the three files a successful run writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub analysis_report: PathBuf,
    pub optimized_procedure: PathBuf,
    pub test_report: PathBuf,
}

/// Build the production agent runtime from the `llm` config section.
pub fn llm_runtime(config: &Config) -> Result<LlmAgentRuntime, PipelineError> {
    let pool = LlmPool::from_config(&config.llm)?;
    Ok(LlmAgentRuntime::new(
        pool,
        config.llm.max_tokens,
        config.llm.max_tool_rounds,
    ))
}

/// Run the pipeline over already-discovered inputs with the given runtime.
///
/// Discovery stays with the caller so a missing procedure is reported
/// before any runtime (and its API key) is needed.
pub async fn run<R>(
    config: &Config,
    layout: &Layout,
    inputs: &SqlInputs,
    runtime: &R,
) -> Result<PipelineReport, PipelineError>
where
    R: AgentRuntime + ?Sized,
{
    info!(
        procedure = %inputs.procedure.path.display(),
        test_queries = inputs.test_queries.len(),
        "inputs loaded"
    );

    create_dir(&layout.outputs_dir)?;

    let mcp = McpClient::new(&config.mcp.url, config.mcp.api_key.clone());
    let database = config.database.name.as_str();
    let schema = mcp.get_schema(database).await?;
    info!(database, "schema fetched");

    let procedure_sql = inputs.procedure.text.as_str();
    let execute_sql = Arc::new(ExecuteSqlTool::new(mcp.clone(), database));
    let crew = agents::sql_optimization_crew(
        agents::athena(schema, procedure_sql),
        agents::daedalus(procedure_sql),
        agents::hermes(
            procedure_sql,
            inputs.test_query_texts(),
            config.db_config_json()?,
            execute_sql,
        ),
    );

    let output = crew.kickoff(runtime).await?;
    write_outputs(&output, &layout.outputs_dir)
}

fn write_outputs(output: &CrewOutput, dir: &Path) -> Result<PipelineReport, PipelineError> {
    let [analysis, implementation, testing] = agents::stage_ids();

    let report = PipelineReport {
        analysis_report: dir.join(ANALYSIS_REPORT),
        optimized_procedure: dir.join(OPTIMIZED_PROCEDURE),
        test_report: dir.join(TEST_REPORT),
    };

    for (id, path) in [
        (analysis, &report.analysis_report),
        (implementation, &report.optimized_procedure),
        (testing, &report.test_report),
    ] {
        let text = output
            .get(&id)
            .ok_or_else(|| PipelineError::MissingResult(id.clone()))?;
        write_file(path, text)?;
        info!(task = %id, path = %path.display(), "output written");
    }

    Ok(report)
}

fn create_dir(dir: &Path) -> Result<(), PipelineError> {
    std::fs::create_dir_all(dir).map_err(|source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), PipelineError> {
    std::fs::write(path, content).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

//! sqlcrew: a three-stage LLM crew for SQL procedure optimization.
//!
//! Analyze → rewrite → test. Athena reads the procedure and the schema,
//! Daedalus rewrites it, Hermes validates the rewrite against the remote
//! execution service.
//!
//! ## Layout
//!
//! - `config`: YAML run configuration
//! - `mcp`: HTTP client for the schema/execution service
//! - `llm`: Anthropic Messages API client
//! - `inputs`: procedure and test query discovery
//! - `crew`: agents, tasks, tools and the sequential crew runtime
//! - `agents`: the three SQL agents and their prompts
//! - `pipeline`: the driver that wires everything and writes the reports

pub mod agents;
pub mod config;
pub mod crew;
pub mod inputs;
pub mod llm;
pub mod mcp;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

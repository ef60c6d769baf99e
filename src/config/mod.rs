//! Run configuration. One YAML file, loaded once and never mutated.
//!
//! ```yaml
//! mcp:
//!   url: http://localhost:8000
//!   api_key: secret        # optional
//! database:
//!   name: sales
//!   dialect: postgres      # anything else is passed through to Hermes
//! llm:                     # optional
//!   model: sonnet
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors from loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mcp: McpConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Remote schema/execution service.
#[derive(Debug, Clone, Deserialize)]
pub struct McpConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Target database. Keys other than `name` are kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Model settings for the agent runtime.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub max_tool_rounds: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "sonnet".into(),
            max_tokens: 4096,
            api_key: None,
            base_url: None,
            max_tool_rounds: 8,
        }
    }
}

impl Config {
    /// Read and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a YAML string (no file involved).
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mcp.url.trim().is_empty() {
            return Err(ConfigError::Invalid("mcp.url is empty".into()));
        }
        if self.database.name.trim().is_empty() {
            return Err(ConfigError::Invalid("database.name is empty".into()));
        }
        if self.llm.max_tool_rounds == 0 {
            return Err(ConfigError::Invalid("llm.max_tool_rounds must be > 0".into()));
        }
        Ok(())
    }

    /// The `database` mapping as JSON, handed to the tester agent.
    pub fn db_config_json(&self) -> Result<serde_json::Value, ConfigError> {
        serde_json::to_value(&self.database)
            .map_err(|e| ConfigError::Invalid(format!("database section is not JSON-compatible: {e}")))
    }
}

//! SQL input discovery.
//!
//! Every `*.sql` file directly under the inputs directory is an artifact.
//! A name containing "procedure" (any case) marks the optimization target;
//! the rest are test queries. Contents are opaque text.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Errors from input discovery.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("No procedure SQL file found in {}/.", dir.display())]
    NoProcedure { dir: PathBuf },

    #[error("invalid inputs directory {}: {source}", dir.display())]
    Pattern {
        dir: PathBuf,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One SQL file and its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlArtifact {
    pub path: PathBuf,
    pub text: String,
}

/// The procedure under test plus its test queries.
#[derive(Debug, Clone)]
pub struct SqlInputs {
    pub procedure: SqlArtifact,
    pub test_queries: Vec<SqlArtifact>,
}

impl SqlInputs {
    pub fn test_query_texts(&self) -> Vec<String> {
        self.test_queries.iter().map(|q| q.text.clone()).collect()
    }
}

/// True when the file name marks a procedure file.
pub fn is_procedure_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().contains("procedure"))
        .unwrap_or(false)
}

/// List `*.sql` files in `dir`, sorted by path.
pub fn list_sql_files(dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    let pattern = glob::Pattern::escape(&dir.to_string_lossy()) + "/*.sql";
    debug!(%pattern, "listing sql inputs");

    let paths = glob::glob(&pattern).map_err(|source| InputError::Pattern {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| InputError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Discover the procedure and test queries under `dir`.
///
/// The first procedure file in sorted order wins. A missing or empty
/// directory is reported as `NoProcedure`.
pub fn discover(dir: &Path) -> Result<SqlInputs, InputError> {
    let files = list_sql_files(dir)?;
    let (procedures, queries): (Vec<PathBuf>, Vec<PathBuf>) =
        files.into_iter().partition(|p| is_procedure_file(p));

    let mut procedures = procedures.into_iter();
    let procedure_path = procedures.next().ok_or_else(|| InputError::NoProcedure {
        dir: dir.to_path_buf(),
    })?;
    for ignored in procedures {
        warn!(path = %ignored.display(), "ignoring extra procedure file");
    }

    let procedure = read_artifact(procedure_path)?;
    let test_queries = queries
        .into_iter()
        .map(read_artifact)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        procedure = %procedure.path.display(),
        queries = test_queries.len(),
        "inputs discovered"
    );

    Ok(SqlInputs {
        procedure,
        test_queries,
    })
}

fn read_artifact(path: PathBuf) -> Result<SqlArtifact, InputError> {
    let text = std::fs::read_to_string(&path).map_err(|source| InputError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(SqlArtifact { path, text })
}

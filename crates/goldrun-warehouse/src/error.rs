use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to the warehouse or running a script.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The script file could not be read.
    #[error("failed to read script {}: {source}", path.display())]
    ScriptUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A statement of a multi-statement script failed to execute.
    #[error("statement {index} failed ({preview}): {source}")]
    StatementFailed {
        /// 1-based position of the statement in the script.
        index: usize,
        preview: String,
        #[source]
        source: Box<WarehouseError>,
    },

    /// A result set did not line up with its column list.
    #[error("malformed result set: {0}")]
    MalformedResult(String),

    /// Statement was rejected before reaching the warehouse.
    #[error("query rejected: {0}")]
    QueryRejected(String),
}

//! # Goldrun Warehouse
//!
//! DuckDB-backed warehouse access and multi-statement script execution for
//! goldrun.
//!
//! ## Overview
//!
//! A metrics run renders a templated SQL script, splits it into statements
//! and executes them one at a time against a single warehouse session. Only
//! the result set of the *last* row-producing statement is kept.
//!
//! ```text
//! render_template ──▶ split_statements ──▶ execute_statements ──▶ ScriptOutput
//!                                                 │
//!                                          WarehouseSession
//!                                         (DuckDbSession, ...)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use goldrun_warehouse::{render_template, run_script, DuckDbSession, WarehouseConfig};
//!
//! fn main() -> Result<(), goldrun_warehouse::WarehouseError> {
//!     let mut session = DuckDbSession::open(&WarehouseConfig::default())?;
//!     let sql = render_template(
//!         "CREATE SCHEMA IF NOT EXISTS {{GOLD_SCHEMA}}; SELECT 42 AS answer;",
//!         [("GOLD_SCHEMA", "gold")],
//!     );
//!     let output = run_script(&mut session, &sql)?;
//!     println!("captured: {:?}", output.last_result);
//!     session.close()
//! }
//! ```
//!
//! ## Limitations
//!
//! - Splitting is line-oriented: a `;` inside a string literal splits the
//!   statement, and a `--` inside one hides the rest of that line.
//! - Template values are inserted verbatim; validate identifiers first.
//! - Statements are not wrapped in a transaction. A failure mid-script leaves
//!   earlier statements applied.

pub mod duckdb;
pub mod error;
pub mod executor;
pub mod session;
pub mod splitter;
pub mod template;
pub mod value;

use std::env;
use std::path::{Path, PathBuf};

pub use crate::duckdb::DuckDbSession;
pub use error::WarehouseError;
pub use executor::{execute_statements, run_script, statement_preview, ScriptOutput};
pub use session::{ResultSet, StatementOutcome, WarehouseSession};
pub use splitter::split_statements;
pub use template::{placeholder_token, render_template};

/// Path value that selects an in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Configuration for the warehouse database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    /// Path to the `DuckDB` database file, or `:memory:`.
    pub db_path: PathBuf,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            db_path: resolve_db_path(),
        }
    }
}

impl WarehouseConfig {
    pub fn in_memory() -> Self {
        Self {
            db_path: PathBuf::from(IN_MEMORY_PATH),
        }
    }

    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path == Path::new(IN_MEMORY_PATH)
    }
}

/// Resolve the database path from the environment or default.
///
/// `GOLDRUN_DB_PATH` wins, then `$GOLDRUN_HOME/warehouse.duckdb`, then
/// `$HOME/.goldrun/warehouse.duckdb`.
fn resolve_db_path() -> PathBuf {
    if let Some(path) = non_empty_env("GOLDRUN_DB_PATH") {
        return path;
    }

    if let Some(home) = non_empty_env("GOLDRUN_HOME") {
        return home.join("warehouse.duckdb");
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".goldrun").join("warehouse.duckdb");
    }

    PathBuf::from(".goldrun").join("warehouse.duckdb")
}

fn non_empty_env(key: &str) -> Option<PathBuf> {
    let value = env::var_os(key)?;
    if value.is_empty() {
        return None;
    }
    Some(PathBuf::from(value))
}

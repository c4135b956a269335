//! `DuckDB`-backed warehouse session.

use std::fs;
use std::path::Path;

use ::duckdb::arrow::datatypes::DataType;
use ::duckdb::{Connection, Statement};

use crate::session::{ResultSet, StatementOutcome, WarehouseSession};
use crate::value::read_row;
use crate::{WarehouseConfig, WarehouseError};

/// Leading keywords of statements whose result set is the caller's data.
const QUERY_KEYWORDS: [&str; 13] = [
    "SELECT", "WITH", "VALUES", "FROM", "TABLE", "SHOW", "DESCRIBE", "DESC", "SUMMARIZE",
    "PIVOT", "UNPIVOT", "EXPLAIN", "CALL",
];

/// Keywords that turn a `WITH` prefix into a data-modifying statement.
const MODIFYING_KEYWORDS: [&str; 4] = ["INSERT", "UPDATE", "DELETE", "MERGE"];

/// A single warehouse connection owned by one run.
///
/// The connection is released exactly once: through [`DuckDbSession::close`]
/// on the success path, or when the session is dropped on any other path.
pub struct DuckDbSession {
    connection: Connection,
}

impl DuckDbSession {
    /// Open the database named by the configuration.
    ///
    /// # Errors
    /// Returns an error if the parent directory cannot be created or the
    /// database cannot be opened or configured.
    pub fn open(config: &WarehouseConfig) -> Result<Self, WarehouseError> {
        if config.is_in_memory() {
            return Self::open_in_memory();
        }
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let connection = open_connection(config.db_path.as_path())?;
        tracing::debug!(path = %config.db_path.display(), "opened warehouse session");
        Ok(Self { connection })
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self, WarehouseError> {
        let connection = Connection::open_in_memory()?;
        configure_connection(&connection)?;
        Ok(Self { connection })
    }

    /// Close the connection, surfacing any error the close itself reports.
    pub fn close(self) -> Result<(), WarehouseError> {
        self.connection
            .close()
            .map_err(|(_, error)| WarehouseError::from(error))?;
        tracing::debug!("closed warehouse session");
        Ok(())
    }
}

impl WarehouseSession for DuckDbSession {
    fn run_statement(&mut self, sql: &str) -> Result<StatementOutcome, WarehouseError> {
        let mut statement = self.connection.prepare(sql)?;
        let mut rows = statement.query([])?;

        let (columns, types) = match rows.as_ref() {
            Some(statement) => (column_names(statement)?, column_types(statement)),
            None => (Vec::new(), Vec::new()),
        };
        if columns.is_empty() || (is_status_schema(&columns, &types) && !returns_rows(sql)) {
            return Ok(StatementOutcome::NoRows);
        }

        let mut data = Vec::new();
        while let Some(row) = rows.next()? {
            data.push(read_row(row, columns.len())?);
        }

        Ok(StatementOutcome::HasRows(ResultSet::new(columns, data)?))
    }
}

fn column_names(statement: &Statement<'_>) -> Result<Vec<String>, ::duckdb::Error> {
    (0..statement.column_count())
        .map(|index| statement.column_name(index).map(ToString::to_string))
        .collect()
}

fn column_types(statement: &Statement<'_>) -> Vec<DataType> {
    (0..statement.column_count())
        .map(|index| statement.column_type(index))
        .collect()
}

/// The single status column `DuckDB` reports in place of a result set:
/// `Count BIGINT` for CREATE/INSERT/UPDATE/DELETE, `Success BOOLEAN` for
/// DROP, SET and transaction control.
fn is_status_schema(columns: &[String], types: &[DataType]) -> bool {
    match (columns, types) {
        ([name], [DataType::Int64]) => name == "Count",
        ([name], [DataType::Boolean]) => name == "Success",
        _ => false,
    }
}

/// Whether the statement's own verb makes its result set caller data.
///
/// A query aliasing a column `Count` or `Success` must keep its rows, so the
/// status shape alone never decides.
fn returns_rows(sql: &str) -> bool {
    let words = keywords(sql);
    if words.iter().any(|word| word == "RETURNING") {
        return true;
    }
    match words.first().map(String::as_str) {
        Some("WITH") => !words
            .iter()
            .any(|word| MODIFYING_KEYWORDS.contains(&word.as_str())),
        Some(first) => QUERY_KEYWORDS.contains(&first),
        None => false,
    }
}

/// Upper-cased bare words of `sql`, skipping comments, quoted text and
/// quoted identifiers.
fn keywords(sql: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut chars = sql.char_indices().peekable();
    let mut current = String::new();

    while let Some((index, ch)) = chars.next() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            current.push(ch.to_ascii_uppercase());
            continue;
        }
        if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        match ch {
            '-' if sql[index..].starts_with("--") => {
                for (_, skipped) in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
            }
            '/' if sql[index..].starts_with("/*") => {
                chars.next();
                let mut previous = '\0';
                for (_, skipped) in chars.by_ref() {
                    if previous == '*' && skipped == '/' {
                        break;
                    }
                    previous = skipped;
                }
            }
            '\'' | '"' => {
                for (_, skipped) in chars.by_ref() {
                    if skipped == ch {
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Open a new database connection.
///
/// # Errors
/// Returns an error if the database file cannot be opened or configured.
fn open_connection(path: &Path) -> Result<Connection, ::duckdb::Error> {
    let connection = Connection::open(path)?;
    configure_connection(&connection)?;
    Ok(connection)
}

/// Configure a database connection with appropriate settings.
fn configure_connection(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch("PRAGMA disable_progress_bar;")?;
    Ok(())
}

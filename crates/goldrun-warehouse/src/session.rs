//! Warehouse session capability and the tagged statement outcome.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::WarehouseError;

/// Column names paired with rows aligned to them.
///
/// A result set is either fully present or absent; every row has exactly one
/// value per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Build a result set, rejecting rows whose arity differs from the column list.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, WarehouseError> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(WarehouseError::MalformedResult(format!(
                "row {index} has {} values for {} columns",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, matched ASCII case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    /// Rows as JSON objects keyed by column name, in projection order.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<Map<String, Value>>()
            })
            .collect()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}

/// What a single executed statement produced.
///
/// Classification happens after execution: a statement is row-producing
/// because the warehouse returned a result schema for it, not because of how
/// its text reads.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    /// The statement returned a result set (possibly with zero rows).
    HasRows(ResultSet),
    /// DDL/DML or any other statement without a result set.
    NoRows,
}

impl StatementOutcome {
    pub fn into_result_set(self) -> Option<ResultSet> {
        match self {
            Self::HasRows(result) => Some(result),
            Self::NoRows => None,
        }
    }
}

/// A live warehouse session owned by one run.
///
/// Implementations execute exactly one statement per call. An `Err` means the
/// statement itself failed; a statement that merely returns no rows is
/// `Ok(StatementOutcome::NoRows)`.
pub trait WarehouseSession {
    fn run_statement(&mut self, sql: &str) -> Result<StatementOutcome, WarehouseError>;
}

impl<S: WarehouseSession + ?Sized> WarehouseSession for &mut S {
    fn run_statement(&mut self, sql: &str) -> Result<StatementOutcome, WarehouseError> {
        (**self).run_statement(sql)
    }
}

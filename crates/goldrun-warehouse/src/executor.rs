//! Sequential execution of multi-statement scripts.

use crate::session::{ResultSet, StatementOutcome, WarehouseSession};
use crate::splitter::split_statements;
use crate::WarehouseError;

const PREVIEW_CHARS: usize = 80;

/// Outcome of a whole script run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptOutput {
    /// Result of the last row-producing statement, if any statement produced rows.
    pub last_result: Option<ResultSet>,
    pub statements_executed: usize,
    pub row_producing_statements: usize,
}

impl ScriptOutput {
    /// The captured `(columns, rows)` pair, or `(None, None)`.
    pub fn into_columns_and_rows(self) -> (Option<Vec<String>>, Option<Vec<Vec<serde_json::Value>>>) {
        match self.last_result {
            Some(result) => {
                let (columns, rows) = result.into_parts();
                (Some(columns), Some(rows))
            }
            None => (None, None),
        }
    }
}

/// Split rendered script text and execute it.
pub fn run_script<S>(session: &mut S, rendered: &str) -> Result<ScriptOutput, WarehouseError>
where
    S: WarehouseSession + ?Sized,
{
    let statements = split_statements(rendered);
    execute_statements(session, &statements)
}

/// Execute statements strictly in order, keeping the last row-producing result.
///
/// The first failing statement aborts the run; statements already executed
/// stay applied.
pub fn execute_statements<S>(
    session: &mut S,
    statements: &[String],
) -> Result<ScriptOutput, WarehouseError>
where
    S: WarehouseSession + ?Sized,
{
    let mut output = ScriptOutput::default();

    for (offset, statement) in statements.iter().enumerate() {
        let index = offset + 1;
        let preview = statement_preview(statement);
        tracing::debug!(index, total = statements.len(), sql = %preview, "executing statement");

        let outcome = session
            .run_statement(statement)
            .map_err(|source| WarehouseError::StatementFailed {
                index,
                preview: preview.clone(),
                source: Box::new(source),
            })?;
        output.statements_executed += 1;

        match outcome {
            StatementOutcome::HasRows(result) => {
                tracing::trace!(index, rows = result.row_count(), "statement produced rows");
                output.row_producing_statements += 1;
                output.last_result = Some(result);
            }
            StatementOutcome::NoRows => {
                tracing::trace!(index, "statement produced no rows");
            }
        }
    }

    Ok(output)
}

/// Single-line, length-capped rendering of a statement for logs and errors.
pub fn statement_preview(statement: &str) -> String {
    let collapsed = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= PREVIEW_CHARS {
        return collapsed;
    }
    let truncated: String = collapsed.chars().take(PREVIEW_CHARS).collect();
    format!("{truncated}...")
}

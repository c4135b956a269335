//! Sequential DDL runners for creating and tearing down a layer schema.

use std::fs;
use std::path::PathBuf;

use goldrun_warehouse::{render_template, run_script, WarehouseError, WarehouseSession};

use crate::identifier::{qualify_schema, Identifier};
use crate::MetricsError;

pub const SCHEMA_NAME_PLACEHOLDER: &str = "SCHEMA_NAME";

/// Per-file statement counts from a bootstrap run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub files: Vec<(PathBuf, usize)>,
}

impl BootstrapReport {
    pub fn statements_executed(&self) -> usize {
        self.files.iter().map(|(_, count)| count).sum()
    }
}

/// Render `{{SCHEMA_NAME}}` in each DDL file and execute them in order.
///
/// Stops at the first unreadable file or failing statement.
pub fn bootstrap_schema<S>(
    session: &mut S,
    schema: &Identifier,
    files: &[PathBuf],
) -> Result<BootstrapReport, MetricsError>
where
    S: WarehouseSession + ?Sized,
{
    let mut report = BootstrapReport::default();

    for path in files {
        let template = fs::read_to_string(path).map_err(|source| WarehouseError::ScriptUnreadable {
            path: path.clone(),
            source,
        })?;
        let rendered = render_template(&template, [(SCHEMA_NAME_PLACEHOLDER, schema.as_str())]);
        let output = run_script(session, &rendered)?;

        tracing::info!(
            file = %path.display(),
            schema = %schema,
            statements = output.statements_executed,
            "applied DDL file"
        );
        report.files.push((path.clone(), output.statements_executed));
    }

    Ok(report)
}

/// `DROP SCHEMA IF EXISTS [catalog.]schema CASCADE`.
pub fn drop_schema<S>(
    session: &mut S,
    catalog: Option<&Identifier>,
    schema: &Identifier,
) -> Result<(), MetricsError>
where
    S: WarehouseSession + ?Sized,
{
    let qualified = qualify_schema(catalog, schema);
    session.run_statement(&format!("DROP SCHEMA IF EXISTS {qualified} CASCADE"))?;
    tracing::info!(schema = %qualified, "dropped schema");
    Ok(())
}

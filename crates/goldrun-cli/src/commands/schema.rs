//! `goldrun schema`: layer schema bootstrap and teardown.

use goldrun_core::{bootstrap_schema, drop_schema, Identifier};
use goldrun_warehouse::WarehouseConfig;

use crate::cli::{SchemaCreateArgs, SchemaDropArgs};
use crate::error::CliError;

use super::open_session;

pub fn create(args: &SchemaCreateArgs, config: &WarehouseConfig) -> Result<(), CliError> {
    let schema = Identifier::parse_as(&args.schema, "schema name")?;

    let mut session = open_session(config)?;
    let report = bootstrap_schema(&mut session, &schema, &args.files)?;
    session.close()?;

    tracing::info!(
        schema = %schema,
        files = report.files.len(),
        statements = report.statements_executed(),
        "schema created"
    );
    Ok(())
}

pub fn teardown(
    args: &SchemaDropArgs,
    config: &WarehouseConfig,
    catalog: Option<&Identifier>,
) -> Result<(), CliError> {
    let schema = Identifier::parse_as(&args.schema, "schema name")?;

    let mut session = open_session(config)?;
    drop_schema(&mut session, catalog, &schema)?;
    session.close()?;
    Ok(())
}

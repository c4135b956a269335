//! `goldrun metrics`: full metrics run against the warehouse.

use goldrun_core::{compute_metrics, write_record, Identifier, MetricsRun, SchemaLayers};
use goldrun_warehouse::WarehouseConfig;
use time::OffsetDateTime;

use crate::cli::MetricsArgs;
use crate::error::CliError;

use super::open_session;

pub fn run(
    args: &MetricsArgs,
    config: &WarehouseConfig,
    catalog: Option<Identifier>,
) -> Result<(), CliError> {
    let layers = resolve_layers(args)?;
    let run = MetricsRun::new(layers, &args.sql_file)
        .with_catalog(catalog)
        .with_run_results(Some(args.run_results.clone()))
        .with_as_of(args.as_of.unwrap_or_else(OffsetDateTime::now_utc));

    let mut session = open_session(config)?;
    let record = compute_metrics(&mut session, &run)?;
    session.close()?;

    write_record(&args.out, &record)?;
    tracing::info!(out = %args.out.display(), "wrote metrics record");

    if args.pretty_lines {
        for line in &record.top_n_lines {
            eprintln!("{line}");
        }
    }
    Ok(())
}

/// Explicit layer flags, else issue-scoped names, else the bare layer names.
fn resolve_layers(args: &MetricsArgs) -> Result<SchemaLayers, CliError> {
    if args.issue_id.is_some() {
        return Ok(SchemaLayers::for_issue(args.issue_id.as_deref())?);
    }

    let defaults = SchemaLayers::for_issue(None)?;
    Ok(SchemaLayers::parse(
        args.gold_schema.as_deref().unwrap_or(defaults.gold.as_str()),
        args.silver_schema.as_deref().unwrap_or(defaults.silver.as_str()),
        args.master_schema.as_deref().unwrap_or(defaults.master.as_str()),
    )?)
}

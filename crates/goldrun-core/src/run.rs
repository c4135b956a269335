use std::fs;
use std::path::PathBuf;

use goldrun_warehouse::{render_template, run_script, WarehouseError, WarehouseSession};
use time::OffsetDateTime;

use crate::aggregate::MetricsAggregator;
use crate::identifier::{Identifier, SchemaLayers};
use crate::report::{assemble_record, MetricsRecord};
use crate::MetricsError;

/// Inputs for one metrics run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsRun {
    pub layers: SchemaLayers,
    /// Optional catalog prefix for aggregate table references.
    pub catalog: Option<Identifier>,
    pub sql_file: PathBuf,
    /// `run_results.json` location; `None` skips the external summary.
    pub run_results: Option<PathBuf>,
    /// Instant the weekly window, trend and freshness are measured against.
    pub as_of: OffsetDateTime,
}

impl MetricsRun {
    pub fn new(layers: SchemaLayers, sql_file: impl Into<PathBuf>) -> Self {
        Self {
            layers,
            catalog: None,
            sql_file: sql_file.into(),
            run_results: None,
            as_of: OffsetDateTime::now_utc(),
        }
    }

    pub fn with_as_of(mut self, as_of: OffsetDateTime) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn with_catalog(mut self, catalog: Option<Identifier>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_run_results(mut self, path: Option<PathBuf>) -> Self {
        self.run_results = path;
        self
    }
}

/// Rebuild the gold tables from the metrics script and assemble the record.
pub fn compute_metrics<S>(session: &mut S, run: &MetricsRun) -> Result<MetricsRecord, MetricsError>
where
    S: WarehouseSession + ?Sized,
{
    let template =
        fs::read_to_string(&run.sql_file).map_err(|source| WarehouseError::ScriptUnreadable {
            path: run.sql_file.clone(),
            source,
        })?;
    let rendered = render_template(&template, run.layers.placeholders());

    tracing::info!(
        script = %run.sql_file.display(),
        gold = %run.layers.gold,
        silver = %run.layers.silver,
        as_of = %run.as_of,
        "running metrics script"
    );
    let output = run_script(session, &rendered)?;

    let aggregator = MetricsAggregator::new(run.catalog.as_ref(), &run.layers, run.as_of);
    let metrics = aggregator.collect(session, run.run_results.as_deref())?;

    let record = assemble_record(output.last_result.as_ref(), &metrics)?;
    tracing::info!(
        statements = output.statements_executed,
        preview_rows = record.top_n.len(),
        wk_orders = record.wk_orders,
        freshness_hours = ?record.freshness_hours,
        tests_total = record.tests_total,
        "metrics computed"
    );
    Ok(record)
}

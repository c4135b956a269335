//! Metrics aggregation and report assembly for goldrun.
//!
//! A run renders the metrics script with validated [`SchemaLayers`],
//! executes it through a [`goldrun_warehouse::WarehouseSession`], queries the
//! rebuilt tables for weekly and trend figures, and assembles one
//! [`MetricsRecord`].

pub mod aggregate;
pub mod bootstrap;
pub mod error;
pub mod identifier;
pub mod report;
pub mod run;
pub mod test_summary;

pub use aggregate::{
    order_trend_pct, AggregateMetrics, MetricsAggregator, TrendComparison, WeeklyRollup,
};
pub use bootstrap::{bootstrap_schema, drop_schema, BootstrapReport, SCHEMA_NAME_PLACEHOLDER};
pub use error::{MetricsError, ValidationError};
pub use identifier::{qualify_schema, qualify_table, Identifier, SchemaLayers};
pub use report::{assemble_record, format_preview_line, write_record, MetricsRecord, PREVIEW_COLUMNS};
pub use run::{compute_metrics, MetricsRun};
pub use test_summary::{
    load_test_summary, pass_rate_pct, summarize_run_results, ExternalTestSummary,
    DEFAULT_RUN_RESULTS_PATH,
};

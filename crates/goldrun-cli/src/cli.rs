//! CLI argument definitions for goldrun.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `metrics` | Run the metrics script and write the snapshot record |
//! | `schema create` | Apply DDL files to a layer schema |
//! | `schema drop` | Drop a layer schema and everything in it |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--db-path` | `$GOLDRUN_DB_PATH` | DuckDB database file or `:memory:` |
//! | `--database` | none | Catalog prefix for fully qualified tables |
//!
//! # Examples
//!
//! ```bash
//! goldrun metrics --sql-file scripts/sql/compute_metrics.sql --issue-id 57
//! goldrun metrics --sql-file compute_metrics.sql --as-of 2026-10-16T06:00:00Z
//! goldrun schema create --schema silver --file ddl/01_schema.sql --file ddl/02_tables.sql
//! goldrun schema drop --schema gold_issue_57
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use goldrun_core::DEFAULT_RUN_RESULTS_PATH;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Warehouse metrics runner.
///
/// Rebuilds the gold tables from a templated SQL script and publishes a
/// point-in-time metrics snapshot as JSON.
#[derive(Debug, Parser)]
#[command(name = "goldrun", author, version, about = "Warehouse metrics runner")]
pub struct Cli {
    /// DuckDB database file (`:memory:` for a throwaway database).
    ///
    /// Overrides GOLDRUN_DB_PATH / GOLDRUN_HOME.
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Catalog name used to qualify table references (`catalog.schema.table`).
    #[arg(long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the metrics script and write the snapshot record.
    ///
    /// # Examples
    ///
    ///   goldrun metrics --sql-file compute_metrics.sql
    ///   goldrun metrics --sql-file compute_metrics.sql --issue-id 57 --pretty-lines
    Metrics(MetricsArgs),

    /// Create or drop a layer schema.
    Schema(SchemaArgs),
}

/// Arguments for the `metrics` command.
#[derive(Debug, Args)]
pub struct MetricsArgs {
    /// Templated SQL script that rebuilds the gold tables.
    #[arg(long)]
    pub sql_file: PathBuf,

    /// Gold layer schema.
    #[arg(long, conflicts_with = "issue_id")]
    pub gold_schema: Option<String>,

    /// Silver layer schema.
    #[arg(long, conflicts_with = "issue_id")]
    pub silver_schema: Option<String>,

    /// Master layer schema.
    #[arg(long, conflicts_with = "issue_id")]
    pub master_schema: Option<String>,

    /// Derive `<layer>_issue_<id>` schemas for an isolated feature run.
    #[arg(long)]
    pub issue_id: Option<String>,

    /// Output path for the metrics record.
    #[arg(long, default_value = "dashboard_metrics.json")]
    pub out: PathBuf,

    /// dbt `run_results.json` with external test outcomes.
    #[arg(long, default_value = DEFAULT_RUN_RESULTS_PATH)]
    pub run_results: PathBuf,

    /// Print the preview lines to stderr after writing the record.
    #[arg(long, default_value_t = false)]
    pub pretty_lines: bool,

    /// RFC 3339 instant the weekly window and freshness are measured
    /// against (default: now).
    #[arg(long, value_parser = parse_timestamp)]
    pub as_of: Option<OffsetDateTime>,
}

fn parse_timestamp(value: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|error| format!("expected RFC 3339: {error}"))
}

/// Arguments for the `schema` command.
#[derive(Debug, Args)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommand,
}

/// Schema subcommands.
#[derive(Debug, Subcommand)]
pub enum SchemaCommand {
    /// Apply DDL files in order, rendering `{{SCHEMA_NAME}}`.
    Create(SchemaCreateArgs),
    /// Drop the schema with CASCADE.
    Drop(SchemaDropArgs),
}

#[derive(Debug, Args)]
pub struct SchemaCreateArgs {
    /// Target schema name.
    #[arg(long)]
    pub schema: String,

    /// DDL script files, applied in the order given.
    #[arg(long = "file", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SchemaDropArgs {
    /// Schema to drop.
    #[arg(long)]
    pub schema: String,
}

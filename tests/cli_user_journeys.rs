//! Behavior-driven tests for CLI user journeys
//!
//! These tests run the built `goldrun` binary against a warehouse file in a
//! temporary directory, checking exit codes and what lands on disk.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::tempdir;

const EXIT_VALIDATION_FAILURE: i32 = 2;
const EXIT_WAREHOUSE_FAILURE: i32 = 3;

const METRICS_SCRIPT: &str = r"
CREATE SCHEMA IF NOT EXISTS {{SILVER_SCHEMA}};
CREATE SCHEMA IF NOT EXISTS {{GOLD_SCHEMA}};

CREATE OR REPLACE TABLE {{SILVER_SCHEMA}}.DAILY_INVENTORY_SNAPSHOT AS
SELECT TIMESTAMP '2026-10-16 00:00:00' AS MOVEMENT_DATE;

CREATE OR REPLACE TABLE {{GOLD_SCHEMA}}.DAILY_INVENTORY_KPIS AS
SELECT CAST(d AS DATE) AS REPORT_DATE, wh AS WAREHOUSE_NAME, product AS PRODUCT_NAME,
       orders AS TOTAL_ORDERS, shipped AS TOTAL_UNITS_SHIPPED,
       repl AS TOTAL_UNITS_REPLENISHED, turn AS STOCK_TURNOVER_RATIO
FROM (VALUES
    ('2026-10-15', 'North DC', 'Widget', 60, 12, 3, 2.0),
    ('2026-10-08', 'North DC', 'Widget', 40, 8, 1, 1.0)
) AS t(d, wh, product, orders, shipped, repl, turn);

SELECT * FROM {{GOLD_SCHEMA}}.DAILY_INVENTORY_KPIS ORDER BY REPORT_DATE DESC;
";

fn goldrun(db_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_goldrun"))
        .arg("--db-path")
        .arg(db_path)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("command should execute")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

// =============================================================================
// CLI User Journey: Metrics Snapshot
// =============================================================================

#[test]
fn user_can_publish_a_metrics_record_from_a_fresh_warehouse() {
    // Given: A templated metrics script and an empty warehouse directory
    let temp = tempdir().expect("tempdir");
    let db_path = temp.path().join("warehouse.duckdb");
    let script = temp.path().join("compute_metrics.sql");
    let out = temp.path().join("dashboard_metrics.json");
    fs::write(&script, METRICS_SCRIPT).expect("write script");

    // When: `goldrun metrics` runs with a pinned as-of instant
    let output = goldrun(
        &db_path,
        &[
            "metrics",
            "--sql-file",
            path_arg(&script),
            "--issue-id",
            "7",
            "--out",
            path_arg(&out),
            "--run-results",
            path_arg(&temp.path().join("missing_run_results.json")),
            "--as-of",
            "2026-10-16T12:00:00Z",
        ],
    );

    // Then: The command succeeds and the record holds the run's numbers
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let record: Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("record written"))
            .expect("valid json");
    assert_eq!(record["wk_orders"], json!(60));
    assert_eq!(record["wk_units"], json!(12));
    assert_eq!(record["last_date"], json!("2026-10-15"));
    assert_eq!(record["order_trend_pct"], json!(50.0));
    assert_eq!(record["freshness_hours"], json!(12));
    assert_eq!(record["tests_total"], json!(0));
    assert_eq!(record["top_n_lines"].as_array().expect("lines").len(), 2);

    // And: The warehouse file now exists on disk
    assert!(db_path.exists(), "warehouse file should be created");
}

#[test]
fn user_passing_an_unsafe_schema_gets_the_validation_exit_code() {
    // Given: A script that would otherwise run
    let temp = tempdir().expect("tempdir");
    let script = temp.path().join("compute_metrics.sql");
    let out = temp.path().join("dashboard_metrics.json");
    fs::write(&script, METRICS_SCRIPT).expect("write script");

    // When: The gold schema carries an injected statement
    let output = goldrun(
        &temp.path().join("warehouse.duckdb"),
        &[
            "metrics",
            "--sql-file",
            path_arg(&script),
            "--gold-schema",
            "gold; DROP SCHEMA silver",
            "--out",
            path_arg(&out),
        ],
    );

    // Then: The run stops before writing anything
    assert_eq!(output.status.code(), Some(EXIT_VALIDATION_FAILURE));
    assert!(!out.exists(), "no record should be written");
}

#[test]
fn user_pointing_at_a_missing_script_gets_the_warehouse_exit_code() {
    // Given: No script at the given path
    let temp = tempdir().expect("tempdir");
    let out = temp.path().join("dashboard_metrics.json");

    // When: `goldrun metrics` runs
    let output = goldrun(
        &temp.path().join("warehouse.duckdb"),
        &[
            "metrics",
            "--sql-file",
            path_arg(&temp.path().join("missing.sql")),
            "--out",
            path_arg(&out),
        ],
    );

    // Then: The failure is reported with the warehouse exit code
    assert_eq!(output.status.code(), Some(EXIT_WAREHOUSE_FAILURE));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("missing.sql"),
        "error should name the script"
    );
    assert!(!out.exists(), "no record should be written");
}

// =============================================================================
// CLI User Journey: Schema Lifecycle
// =============================================================================

#[test]
fn user_can_create_and_then_drop_a_layer_schema() {
    // Given: A DDL file templated on the schema name
    let temp = tempdir().expect("tempdir");
    let db_path = temp.path().join("warehouse.duckdb");
    let ddl = temp.path().join("01_tables.sql");
    fs::write(
        &ddl,
        "CREATE SCHEMA IF NOT EXISTS {{SCHEMA_NAME}};\n\
         -- snapshot of daily stock movements\n\
         CREATE TABLE {{SCHEMA_NAME}}.DAILY_INVENTORY_SNAPSHOT (MOVEMENT_DATE TIMESTAMP);",
    )
    .expect("write ddl");

    // When: The schema is created, then dropped
    let created = goldrun(
        &db_path,
        &["schema", "create", "--schema", "silver_issue_7", "--file", path_arg(&ddl)],
    );
    let dropped = goldrun(&db_path, &["schema", "drop", "--schema", "silver_issue_7"]);

    // Then: Both commands exit cleanly
    assert!(
        created.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&created.stderr)
    );
    assert!(
        dropped.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&dropped.stderr)
    );
}

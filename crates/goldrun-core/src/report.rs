//! Shapes aggregate scalars and preview rows into the published record.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use goldrun_warehouse::ResultSet;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::aggregate::{round_to, AggregateMetrics};
use crate::MetricsError;

/// Columns every preview row must carry, in line-format order.
pub const PREVIEW_COLUMNS: [&str; 7] = [
    "REPORT_DATE",
    "WAREHOUSE_NAME",
    "PRODUCT_NAME",
    "TOTAL_ORDERS",
    "TOTAL_UNITS_SHIPPED",
    "TOTAL_UNITS_REPLENISHED",
    "STOCK_TURNOVER_RATIO",
];

/// One metrics snapshot. Every field is always present in the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub last_date: Option<String>,
    pub wk_orders: i64,
    pub wk_units: i64,
    pub avg_turnover: f64,
    pub order_trend_pct: Option<f64>,
    pub tests_total: u64,
    pub tests_passed: u64,
    pub tests_failed: u64,
    pub pass_rate_pct: f64,
    pub freshness_hours: Option<i64>,
    /// Reserved for rule evaluation; always `false`.
    pub anomaly_flag: bool,
    pub top_n: Vec<Map<String, Value>>,
    pub top_n_lines: Vec<String>,
}

/// Combine the captured preview with the aggregate scalars.
///
/// A preview that has rows but lacks one of [`PREVIEW_COLUMNS`] is rejected.
pub fn assemble_record(
    preview: Option<&ResultSet>,
    metrics: &AggregateMetrics,
) -> Result<MetricsRecord, MetricsError> {
    let (top_n, top_n_lines) = match preview {
        Some(result) if !result.is_empty() => (result.records(), preview_lines(result)?),
        _ => (Vec::new(), Vec::new()),
    };

    let tests = metrics.tests.unwrap_or_default();

    Ok(MetricsRecord {
        last_date: metrics.weekly.last_date.clone(),
        wk_orders: metrics.weekly.total_orders.unwrap_or(0),
        wk_units: metrics.weekly.total_units.unwrap_or(0),
        avg_turnover: round_to(metrics.weekly.avg_turnover.unwrap_or(0.0), 3),
        order_trend_pct: metrics.trend.pct(),
        tests_total: tests.tests_total,
        tests_passed: tests.tests_passed,
        tests_failed: tests.tests_failed(),
        pass_rate_pct: tests.pass_rate_pct(),
        freshness_hours: metrics.freshness_hours,
        anomaly_flag: false,
        top_n,
        top_n_lines,
    })
}

/// One formatted line per preview row.
pub fn preview_lines(result: &ResultSet) -> Result<Vec<String>, MetricsError> {
    let mut positions = [0usize; PREVIEW_COLUMNS.len()];
    for (slot, column) in positions.iter_mut().zip(PREVIEW_COLUMNS) {
        *slot = result
            .column_index(column)
            .ok_or(MetricsError::MissingColumn { column })?;
    }

    Ok(result
        .rows()
        .iter()
        .map(|row| {
            let cells = positions.map(|index| render_cell(&row[index]));
            format_preview_line(&cells)
        })
        .collect())
}

/// `` • `date` — warehouse / product (orders=…, shipped=…, repl=…, turn=…) ``
pub fn format_preview_line(cells: &[String; PREVIEW_COLUMNS.len()]) -> String {
    let [date, warehouse, product, orders, shipped, replenished, turnover] = cells;
    format!(
        "• `{date}` — {warehouse} / {product} (orders={orders}, shipped={shipped}, repl={replenished}, turn={turnover})"
    )
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Write the record as pretty-printed JSON, replacing any existing file.
pub fn write_record(path: &Path, record: &MetricsRecord) -> Result<(), MetricsError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, record)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

//! Follow-up aggregate queries against the rebuilt tables.
//!
//! Weekly rollup and trend are core to the record and propagate failures.
//! Freshness and the external test summary degrade to their fallbacks.
//!
//! Every query is anchored on the run's `as_of` instant, rendered into the
//! SQL as a UTC `DATE`/`TIMESTAMP` literal. The warehouse clock is never
//! consulted, so no time-zone extension is needed.

use std::path::Path;

use goldrun_warehouse::{StatementOutcome, WarehouseSession};
use serde::Serialize;
use serde_json::Value;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::identifier::{qualify_table, Identifier, SchemaLayers};
use crate::test_summary::{load_test_summary, ExternalTestSummary};
use crate::MetricsError;

pub const KPI_TABLE: &str = "DAILY_INVENTORY_KPIS";
pub const SNAPSHOT_TABLE: &str = "DAILY_INVENTORY_SNAPSHOT";

/// Order, unit and turnover totals over the trailing seven days.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyRollup {
    pub last_date: Option<String>,
    pub total_orders: Option<i64>,
    pub total_units: Option<i64>,
    pub avg_turnover: Option<f64>,
}

/// Order totals for yesterday and the same weekday one week earlier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrendComparison {
    pub yesterday: Option<i64>,
    pub week_before: Option<i64>,
}

impl TrendComparison {
    pub fn pct(&self) -> Option<f64> {
        order_trend_pct(self.yesterday, self.week_before)
    }
}

/// Every scalar the report needs besides the preview rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateMetrics {
    pub weekly: WeeklyRollup,
    pub trend: TrendComparison,
    pub freshness_hours: Option<i64>,
    pub tests: Option<ExternalTestSummary>,
}

/// `100 * (d1 - d8) / d8` to one decimal; `None` unless both values are
/// present and non-zero.
pub fn order_trend_pct(yesterday: Option<i64>, week_before: Option<i64>) -> Option<f64> {
    match (yesterday, week_before) {
        (Some(d1), Some(d8)) if d1 != 0 && d8 != 0 => {
            Some(round_to(100.0 * (d1 as f64 - d8 as f64) / d8 as f64, 1))
        }
        _ => None,
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// Issues the fixed battery of read queries for one run.
#[derive(Debug, Clone)]
pub struct MetricsAggregator {
    kpi_table: String,
    snapshot_table: String,
    as_of: PrimitiveDateTime,
}

impl MetricsAggregator {
    pub fn new(catalog: Option<&Identifier>, layers: &SchemaLayers, as_of: OffsetDateTime) -> Self {
        let utc = as_of.to_offset(UtcOffset::UTC);
        Self {
            kpi_table: qualify_table(catalog, &layers.gold, KPI_TABLE),
            snapshot_table: qualify_table(catalog, &layers.silver, SNAPSHOT_TABLE),
            as_of: PrimitiveDateTime::new(utc.date(), utc.time()),
        }
    }

    /// The UTC calendar day the weekly window and trend end on.
    pub fn report_date(&self) -> Date {
        self.as_of.date()
    }

    /// Run every sub-step; only rollup and trend failures abort.
    pub fn collect<S>(
        &self,
        session: &mut S,
        run_results: Option<&Path>,
    ) -> Result<AggregateMetrics, MetricsError>
    where
        S: WarehouseSession + ?Sized,
    {
        let weekly = self.weekly_rollup(session)?;
        let trend = self.trend(session)?;
        let freshness_hours = self.freshness_hours(session);
        let tests = run_results.and_then(load_test_summary);

        Ok(AggregateMetrics {
            weekly,
            trend,
            freshness_hours,
            tests,
        })
    }

    pub fn weekly_rollup<S>(&self, session: &mut S) -> Result<WeeklyRollup, MetricsError>
    where
        S: WarehouseSession + ?Sized,
    {
        let sql = format!(
            r"
WITH d AS (
    SELECT report_date,
           SUM(TOTAL_ORDERS) AS total_orders,
           SUM(TOTAL_UNITS_SHIPPED) AS units_shipped,
           AVG(STOCK_TURNOVER_RATIO) AS stock_turnover_ratio
    FROM {table}
    WHERE report_date >= {today} - 7
      AND report_date <= {today}
    GROUP BY 1
)
SELECT CAST(MAX(report_date) AS VARCHAR),
       CAST(SUM(total_orders) AS BIGINT),
       CAST(SUM(units_shipped) AS BIGINT),
       CAST(AVG(stock_turnover_ratio) AS DOUBLE)
FROM d",
            table = self.kpi_table,
            today = date_literal(self.report_date()),
        );
        let row = query_single_row(session, "weekly rollup", &sql, 4)?;

        Ok(WeeklyRollup {
            last_date: optional_string(&row[0]),
            total_orders: optional_i64("weekly rollup", &row[1])?,
            total_units: optional_i64("weekly rollup", &row[2])?,
            avg_turnover: optional_f64("weekly rollup", &row[3])?,
        })
    }

    pub fn trend<S>(&self, session: &mut S) -> Result<TrendComparison, MetricsError>
    where
        S: WarehouseSession + ?Sized,
    {
        let sql = format!(
            r"
WITH b AS (
    SELECT report_date, SUM(TOTAL_ORDERS) AS total_orders
    FROM {table}
    GROUP BY 1
)
SELECT
    (SELECT CAST(total_orders AS BIGINT) FROM b
      WHERE report_date = {today} - 1) AS d1,
    (SELECT CAST(total_orders AS BIGINT) FROM b
      WHERE report_date = {today} - 8) AS d8",
            table = self.kpi_table,
            today = date_literal(self.report_date()),
        );
        let row = query_single_row(session, "trend", &sql, 2)?;

        Ok(TrendComparison {
            yesterday: optional_i64("trend", &row[0])?,
            week_before: optional_i64("trend", &row[1])?,
        })
    }

    /// Hours since the newest movement in the snapshot table; `None` on any failure.
    pub fn freshness_hours<S>(&self, session: &mut S) -> Option<i64>
    where
        S: WarehouseSession + ?Sized,
    {
        let sql = format!(
            "SELECT date_diff('hour', CAST(MAX(MOVEMENT_DATE) AS TIMESTAMP), {now}) FROM {table}",
            table = self.snapshot_table,
            now = timestamp_literal(self.as_of),
        );

        let result = query_single_row(session, "freshness", &sql, 1)
            .and_then(|row| optional_i64("freshness", &row[0]));
        match result {
            Ok(hours) => hours,
            Err(error) => {
                tracing::warn!(table = %self.snapshot_table, %error, "freshness unavailable");
                None
            }
        }
    }
}

fn date_literal(date: Date) -> String {
    format!("DATE '{date}'")
}

fn timestamp_literal(moment: PrimitiveDateTime) -> String {
    format!(
        "TIMESTAMP '{} {:02}:{:02}:{:02}'",
        moment.date(),
        moment.hour(),
        moment.minute(),
        moment.second()
    )
}

/// First row of a query that must return exactly `arity` columns.
fn query_single_row<S>(
    session: &mut S,
    query: &'static str,
    sql: &str,
    arity: usize,
) -> Result<Vec<Value>, MetricsError>
where
    S: WarehouseSession + ?Sized,
{
    let result = match session.run_statement(sql)? {
        StatementOutcome::HasRows(result) => result,
        StatementOutcome::NoRows => {
            return Err(MetricsError::UnexpectedShape {
                query,
                detail: String::from("statement produced no result set"),
            })
        }
    };

    if result.columns().len() != arity {
        return Err(MetricsError::UnexpectedShape {
            query,
            detail: format!("expected {arity} columns, got {}", result.columns().len()),
        });
    }

    let (_, rows) = result.into_parts();
    rows.into_iter()
        .next()
        .ok_or_else(|| MetricsError::UnexpectedShape {
            query,
            detail: String::from("no rows returned"),
        })
}

fn optional_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn optional_i64(query: &'static str, value: &Value) -> Result<Option<i64>, MetricsError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.round() as i64))
            .map(Some)
            .ok_or_else(|| not_numeric(query, value)),
        other => Err(not_numeric(query, other)),
    }
}

fn optional_f64(query: &'static str, value: &Value) -> Result<Option<f64>, MetricsError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| not_numeric(query, value)),
        other => Err(not_numeric(query, other)),
    }
}

fn not_numeric(query: &'static str, value: &Value) -> MetricsError {
    MetricsError::UnexpectedShape {
        query,
        detail: format!("expected a number, got {value}"),
    }
}

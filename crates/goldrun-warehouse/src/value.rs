//! Conversion of `DuckDB` values into JSON.

use ::duckdb::types::{TimeUnit, Value as DuckValue};
use serde_json::{Number, Value};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

/// Read a single row from the result set.
pub(crate) fn read_row(
    row: &::duckdb::Row<'_>,
    column_count: usize,
) -> Result<Vec<Value>, ::duckdb::Error> {
    let mut output = Vec::with_capacity(column_count);
    for index in 0..column_count {
        let value: DuckValue = row.get(index)?;
        output.push(to_json_value(value));
    }
    Ok(output)
}

/// Convert a `DuckDB` value to a JSON value.
pub fn to_json_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(value) => Value::Bool(value),
        DuckValue::TinyInt(value) => Value::Number(Number::from(value)),
        DuckValue::SmallInt(value) => Value::Number(Number::from(value)),
        DuckValue::Int(value) => Value::Number(Number::from(value)),
        DuckValue::BigInt(value) => Value::Number(Number::from(value)),
        DuckValue::HugeInt(value) => match i64::try_from(value) {
            Ok(value) => Value::Number(Number::from(value)),
            Err(_) => number_from_f64(value as f64),
        },
        DuckValue::UTinyInt(value) => Value::Number(Number::from(value)),
        DuckValue::USmallInt(value) => Value::Number(Number::from(value)),
        DuckValue::UInt(value) => Value::Number(Number::from(value)),
        DuckValue::UBigInt(value) => Value::Number(Number::from(value)),
        DuckValue::Float(value) => number_from_f64(f64::from(value)),
        DuckValue::Double(value) => number_from_f64(value),
        DuckValue::Decimal(value) => {
            let rendered = value.to_string();
            rendered
                .parse::<f64>()
                .map(number_from_f64)
                .unwrap_or(Value::String(rendered))
        }
        DuckValue::Date32(days) => date_to_json(days),
        DuckValue::Timestamp(unit, value) => timestamp_to_json(unit, value),
        DuckValue::Text(value) => Value::String(value),
        DuckValue::Blob(value) => Value::String(hex::encode(value)),
        other => Value::String(format!("{other:?}")),
    }
}

/// Convert an f64 to a JSON number, returning Null for NaN/Inf.
pub fn number_from_f64(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn date_to_json(days_since_epoch: i32) -> Value {
    OffsetDateTime::UNIX_EPOCH
        .date()
        .checked_add(Duration::days(i64::from(days_since_epoch)))
        .map(|date| Value::String(date.to_string()))
        .unwrap_or(Value::Null)
}

fn timestamp_to_json(unit: TimeUnit, value: i64) -> Value {
    let nanos_per_unit: i128 = match unit {
        TimeUnit::Second => 1_000_000_000,
        TimeUnit::Millisecond => 1_000_000,
        TimeUnit::Microsecond => 1_000,
        TimeUnit::Nanosecond => 1,
    };
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(value) * nanos_per_unit)
        .ok()
        .and_then(|timestamp| timestamp.format(&Rfc3339).ok())
        .map(Value::String)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_doubles_become_null() {
        assert_eq!(to_json_value(DuckValue::Double(f64::NAN)), Value::Null);
        assert_eq!(to_json_value(DuckValue::Double(f64::INFINITY)), Value::Null);
    }

    #[test]
    fn dates_render_as_iso_calendar_dates() {
        assert_eq!(
            to_json_value(DuckValue::Date32(0)),
            Value::String(String::from("1970-01-01"))
        );
        assert_eq!(
            to_json_value(DuckValue::Date32(20_000)),
            Value::String(String::from("2024-10-04"))
        );
    }

    #[test]
    fn timestamps_render_as_rfc3339() {
        let value = to_json_value(DuckValue::Timestamp(TimeUnit::Second, 86_400));
        assert_eq!(value, Value::String(String::from("1970-01-02T00:00:00Z")));
    }

    #[test]
    fn blobs_render_as_hex() {
        assert_eq!(
            to_json_value(DuckValue::Blob(vec![0xde, 0xad])),
            Value::String(String::from("dead"))
        );
    }
}

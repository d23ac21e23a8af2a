//! Flux query construction.
//!
//! Only two query shapes exist: the sensor catalog (distinct identifiers over
//! a one-year lookback) and the pivoted per-sensor readings over an optional
//! window. Sensor identifiers are the only externally supplied text that ends
//! up inside a query; they are validated against a strict allow-list before
//! interpolation so they cannot carry Flux syntax.

use sensordash_types::TimeRange;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::ProxyError;

/// Upper bound on accepted sensor identifier length.
const MAX_SENSOR_ID_LEN: usize = 128;

/// Validate a sensor identifier before it is interpolated into a query.
///
/// Accepts non-empty identifiers up to 128 characters drawn from
/// `[A-Za-z0-9._:-]`. Everything else (quotes, whitespace, parentheses,
/// control characters) is rejected up front, without contacting the upstream.
pub fn validate_sensor_id(id: &str) -> Result<(), ProxyError> {
    if id.is_empty() || id.len() > MAX_SENSOR_ID_LEN {
        return Err(ProxyError::InvalidSensorId(id.to_string()));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '-');
    if !id.chars().all(allowed) {
        return Err(ProxyError::InvalidSensorId(id.to_string()));
    }
    Ok(())
}

/// Quote a string for use as a Flux string literal.
///
/// Bucket and measurement names come from operator configuration, not user
/// input, but they may legitimately contain spaces; escaping keeps them from
/// breaking the query text.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Render the window bounds as Flux range expressions.
///
/// Absent bounds fall back to the server defaults: a one-year lookback for
/// the start, `now()` for the stop. Bound ordering is not checked; an
/// inverted window is passed through for the upstream to judge.
fn range_exprs(range: &TimeRange) -> (String, String) {
    let fmt = |t: &OffsetDateTime| {
        t.format(&Rfc3339)
            .unwrap_or_else(|_| "now()".to_string())
    };
    let start = range.start.as_ref().map(fmt).unwrap_or_else(|| "-1y".to_string());
    let stop = range.end.as_ref().map(fmt).unwrap_or_else(|| "now()".to_string());
    (start, stop)
}

/// Query selecting the distinct sensor identifiers seen in the last year.
pub fn list_sensors_query(bucket: &str, measurement: &str) -> String {
    format!(
        "from(bucket: {bucket}) \
         |> range(start: -1y) \
         |> filter(fn: (r) => r._measurement == {measurement}) \
         |> keep(columns: [\"sensor_id\"]) \
         |> distinct(column: \"sensor_id\")",
        bucket = quote(bucket),
        measurement = quote(measurement),
    )
}

/// Query selecting one pivoted row per timestamp for a single sensor.
///
/// Fails without building a query if the identifier does not pass
/// [`validate_sensor_id`].
pub fn sensor_readings_query(
    bucket: &str,
    measurement: &str,
    sensor_id: &str,
    range: &TimeRange,
) -> Result<String, ProxyError> {
    validate_sensor_id(sensor_id)?;
    let (start, stop) = range_exprs(range);

    Ok(format!(
        "from(bucket: {bucket}) \
         |> range(start: {start}, stop: {stop}) \
         |> filter(fn: (r) => r._measurement == {measurement} and r.sensor_id == \"{sensor_id}\") \
         |> pivot(rowKey:[\"_time\"], columnKey: [\"_field\"], valueColumn: \"_value\") \
         |> keep(columns: [\"_time\", \"original_hex\", \"presence\"])",
        bucket = quote(bucket),
        measurement = quote(measurement),
    ))
}

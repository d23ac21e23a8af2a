//! CSV-to-JSON translation for upstream query responses.
//!
//! The upstream query API answers in annotated CSV: one header line followed
//! by zero or more data lines. Parsing here is keyed by header *name*, not by
//! fixed column index, so a column reordering from the upstream service does
//! not silently corrupt output.
//!
//! Known constraint: values are split naively on commas with no quoting
//! support. The fields this proxy selects (`sensor_id`, `_time`,
//! `original_hex`, `presence`) never contain commas, so this matches the
//! upstream contract for these two query shapes only.

use sensordash_types::RawRow;

use crate::error::ProxyError;

/// Split a CSV response into a header record and data records.
///
/// A response that is blank after trimming has no header and no rows.
/// Blank lines between or after records are skipped (the upstream terminates
/// responses with empty lines).
fn records(text: &str) -> Vec<Vec<&str>> {
    text.trim()
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(|line| line.split(',').collect())
        .collect()
}

/// Extract a single named column from a CSV response.
///
/// Returns exactly one value per data row, in row order. Fails if the header
/// does not contain `column` or if any data row is too short to carry it.
pub fn parse_column(text: &str, column: &str) -> Result<Vec<String>, ProxyError> {
    let mut records = records(text).into_iter();
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };

    let index = header
        .iter()
        .position(|name| *name == column)
        .ok_or_else(|| ProxyError::Csv(format!("column '{column}' not found in header")))?;

    records
        .map(|record| {
            record
                .get(index)
                .map(|value| value.to_string())
                .ok_or_else(|| {
                    ProxyError::Csv(format!("data row too short for column '{column}'"))
                })
        })
        .collect()
}

/// Convert a CSV response into one object per data row.
///
/// Each row maps the literal header names to the literal cell strings. Rows
/// shorter than the header simply omit the trailing keys, mirroring how the
/// original translation dropped undefined cells. A well-formed response with
/// zero data rows yields an empty list, not an error.
pub fn parse_rows(text: &str) -> Result<Vec<RawRow>, ProxyError> {
    let mut records = records(text).into_iter();
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };

    let rows = records
        .map(|record| {
            header
                .iter()
                .enumerate()
                .filter_map(|(index, name)| {
                    record
                        .get(index)
                        .map(|value| (name.to_string(), value.to_string()))
                })
                .collect()
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENSOR_CSV: &str = "\
,result,table,sensor_id\r\n\
,_result,0,sensor-a\r\n\
,_result,0,sensor-b\r\n\
,_result,0,sensor-c\r\n\
\r\n";

    const DATA_CSV: &str = "\
,result,table,_time,original_hex,presence\r\n\
,_result,0,2024-05-01T12:00:00Z,0a1b,1\r\n\
,_result,0,2024-05-01T12:01:00Z,0c2d,0\r\n\
\r\n";

    #[test]
    fn test_parse_column_one_value_per_row() {
        let ids = parse_column(SENSOR_CSV, "sensor_id").unwrap();
        assert_eq!(ids, vec!["sensor-a", "sensor-b", "sensor-c"]);
    }

    #[test]
    fn test_parse_column_tolerates_reordering() {
        let reordered = "sensor_id,result,table\nsensor-a,_result,0\nsensor-b,_result,0\n";
        let ids = parse_column(reordered, "sensor_id").unwrap();
        assert_eq!(ids, vec!["sensor-a", "sensor-b"]);
    }

    #[test]
    fn test_parse_column_missing_header_is_error() {
        let err = parse_column(DATA_CSV, "sensor_id").unwrap_err();
        assert!(err.to_string().contains("sensor_id"));
    }

    #[test]
    fn test_parse_column_empty_response() {
        assert!(parse_column("", "sensor_id").unwrap().is_empty());
        assert!(parse_column("\r\n\r\n", "sensor_id").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rows_header_keys_literal_values() {
        let rows = parse_rows(DATA_CSV).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        // Exactly the header's keys, including the empty annotation column.
        assert_eq!(first.len(), 6);
        assert_eq!(first.get("_time").map(String::as_str), Some("2024-05-01T12:00:00Z"));
        assert_eq!(first.get("original_hex").map(String::as_str), Some("0a1b"));
        assert_eq!(first.get("presence").map(String::as_str), Some("1"));

        let second = &rows[1];
        assert_eq!(second.get("presence").map(String::as_str), Some("0"));
    }

    #[test]
    fn test_parse_rows_reordered_columns_same_result() {
        let rows = parse_rows(DATA_CSV).unwrap();
        let reordered = "\
,result,table,presence,original_hex,_time\n\
,_result,0,1,0a1b,2024-05-01T12:00:00Z\n\
,_result,0,0,0c2d,2024-05-01T12:01:00Z\n";
        assert_eq!(parse_rows(reordered).unwrap(), rows);
    }

    #[test]
    fn test_parse_rows_short_row_omits_trailing_keys() {
        let text = "a,b,c\n1,2\n";
        let rows = parse_rows(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("a").map(String::as_str), Some("1"));
        assert_eq!(rows[0].get("b").map(String::as_str), Some("2"));
        assert!(!rows[0].contains_key("c"));
    }

    #[test]
    fn test_parse_rows_zero_data_rows() {
        let header_only = ",result,table,_time,original_hex,presence\r\n\r\n";
        assert!(parse_rows(header_only).unwrap().is_empty());
    }
}

//! Row payloads and the proxy's error body.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One pivoted query-result row, exactly as translated from upstream CSV.
///
/// Keys are the literal CSV header names (`_time`, `original_hex`,
/// `presence`, plus whatever bookkeeping columns the upstream includes),
/// values are the literal cell strings. The proxy never coerces types;
/// clients decide what is numeric.
pub type RawRow = BTreeMap<String, String>;

/// Column name for the reading timestamp.
pub const COL_TIME: &str = "_time";
/// Column name for the opaque hex payload.
pub const COL_ORIGINAL_HEX: &str = "original_hex";
/// Column name for the presence value. May be absent from a row; consumers
/// default it to `1`.
pub const COL_PRESENCE: &str = "presence";
/// Column name carrying the sensor identifier in the catalog query.
pub const COL_SENSOR_ID: &str = "sensor_id";

/// JSON body returned by the proxy with every `500` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short description of the operation that failed.
    pub error: String,
    /// Underlying failure detail (upstream status/body, parse error, ...).
    pub details: String,
}

impl ErrorBody {
    /// Create an error body from an operation label and a failure detail.
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_round_trip() {
        let body = ErrorBody::new("Error fetching sensor IDs", "HTTP error! Status: 503");
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"error\""));
        assert!(json.contains("\"details\""));

        let back: ErrorBody = serde_json::from_str(&json).unwrap();
        assert_eq!(back, body);
    }

    #[test]
    fn test_raw_row_preserves_literal_strings() {
        let json = r#"{"_time":"2024-05-01T12:00:00Z","original_hex":"0a1b","presence":"1"}"#;
        let row: RawRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.get(COL_PRESENCE).map(String::as_str), Some("1"));
        assert_eq!(row.get(COL_ORIGINAL_HEX).map(String::as_str), Some("0a1b"));
    }
}

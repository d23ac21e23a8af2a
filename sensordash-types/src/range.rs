//! Time-window parameters for data queries.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// An optional time window for a sensor-data query.
///
/// Both bounds are optional. An absent bound means "use the server default"
/// (a one-year lookback for `start`, "now" for `end`). The proxy does not
/// validate ordering; a window with `start > end` is passed through to the
/// upstream database, whose own validation governs the outcome.
///
/// Serializes to/from the `start`/`end` query parameters as RFC 3339
/// timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive lower bound of the window.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<OffsetDateTime>,
    /// Exclusive upper bound of the window.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<OffsetDateTime>,
}

impl TimeRange {
    /// A window with no bounds (server defaults apply).
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Build a window from optional RFC 3339 strings.
    ///
    /// Empty strings are treated as absent bounds.
    pub fn from_rfc3339(
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, time::error::Parse> {
        let parse = |s: Option<&str>| -> Result<Option<OffsetDateTime>, time::error::Parse> {
            match s {
                Some(s) if !s.trim().is_empty() => {
                    Ok(Some(OffsetDateTime::parse(s.trim(), &Rfc3339)?))
                }
                _ => Ok(None),
            }
        };
        Ok(Self {
            start: parse(start)?,
            end: parse(end)?,
        })
    }

    /// True if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_unbounded_by_default() {
        assert!(TimeRange::default().is_unbounded());
        assert!(TimeRange::unbounded().is_unbounded());
    }

    #[test]
    fn test_from_rfc3339() {
        let range = TimeRange::from_rfc3339(
            Some("2024-05-01T00:00:00Z"),
            Some("2024-05-02T00:00:00Z"),
        )
        .unwrap();
        assert_eq!(range.start, Some(datetime!(2024-05-01 00:00:00 UTC)));
        assert_eq!(range.end, Some(datetime!(2024-05-02 00:00:00 UTC)));
    }

    #[test]
    fn test_from_rfc3339_blank_means_absent() {
        let range = TimeRange::from_rfc3339(Some(""), None).unwrap();
        assert!(range.is_unbounded());
    }

    #[test]
    fn test_from_rfc3339_rejects_garbage() {
        assert!(TimeRange::from_rfc3339(Some("yesterday"), None).is_err());
    }

    #[test]
    fn test_query_param_round_trip() {
        let range = TimeRange {
            start: Some(datetime!(2024-05-01 00:00:00 UTC)),
            end: None,
        };
        let json = serde_json::to_string(&range).unwrap();
        assert!(json.contains("2024-05-01T00:00:00Z"));
        assert!(!json.contains("end"));

        let back: TimeRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);
    }

    #[test]
    fn test_inverted_range_is_representable() {
        // start > end is deliberately not rejected here; the upstream
        // database decides what an inverted window means.
        let range = TimeRange::from_rfc3339(
            Some("2024-05-02T00:00:00Z"),
            Some("2024-05-01T00:00:00Z"),
        )
        .unwrap();
        assert!(range.start.unwrap() > range.end.unwrap());
    }
}

//! Reading interpretation and the merge pipeline.
//!
//! The proxy hands back rows of literal strings; this module decides what is
//! numeric. Per-sensor batches are merged into one flat sequence tagged with
//! each sensor's current nickname, then grouped per nickname for the scatter
//! chart.

use rand::Rng;
use ratatui::style::Color;
use sensordash_types::{RawRow, COL_ORIGINAL_HEX, COL_PRESENCE, COL_TIME};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// One interpreted reading, tagged with its sensor's nickname.
#[derive(Debug, Clone)]
pub struct Reading {
    /// Parsed timestamp, when the raw value was valid RFC 3339. Rows with an
    /// unparseable timestamp still appear in the table (showing the raw
    /// string) but are excluded from the chart.
    pub time: Option<OffsetDateTime>,
    /// The timestamp exactly as the proxy returned it.
    pub time_raw: String,
    pub original_hex: String,
    /// Defaults to 1 when the source row omits the field or the value is not
    /// numeric.
    pub presence: f64,
    pub nickname: String,
}

/// Interpret one raw row.
pub fn reading_from_row(row: &RawRow, nickname: &str) -> Reading {
    let time_raw = row.get(COL_TIME).cloned().unwrap_or_default();
    let time = OffsetDateTime::parse(&time_raw, &Rfc3339).ok();
    let original_hex = row.get(COL_ORIGINAL_HEX).cloned().unwrap_or_default();
    let presence = row
        .get(COL_PRESENCE)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(1.0);

    Reading {
        time,
        time_raw,
        original_hex,
        presence,
        nickname: nickname.to_string(),
    }
}

/// Merge per-sensor batches into one flat sequence, in batch order.
pub fn merge_readings(batches: &[(String, Vec<RawRow>)]) -> Vec<Reading> {
    batches
        .iter()
        .flat_map(|(nickname, rows)| rows.iter().map(|row| reading_from_row(row, nickname)))
        .collect()
}

/// One scatter-chart dataset: all of a nickname's chartable points.
#[derive(Debug, Clone)]
pub struct ChartGroup {
    pub nickname: String,
    pub color: Color,
    /// (unix timestamp seconds, presence)
    pub points: Vec<(f64, f64)>,
}

/// Group readings per nickname, in first-seen order.
///
/// Each group gets a freshly randomized color; colors are deliberately NOT
/// stable across renders. Readings without a parseable timestamp are
/// skipped.
pub fn chart_groups(readings: &[Reading]) -> Vec<ChartGroup> {
    let mut rng = rand::thread_rng();
    let mut groups: Vec<ChartGroup> = Vec::new();

    for reading in readings {
        let Some(time) = reading.time else {
            continue;
        };
        let point = (time.unix_timestamp() as f64, reading.presence);

        match groups.iter_mut().find(|g| g.nickname == reading.nickname) {
            Some(group) => group.points.push(point),
            None => groups.push(ChartGroup {
                nickname: reading.nickname.clone(),
                color: random_color(&mut rng),
                points: vec![point],
            }),
        }
    }

    groups
}

fn random_color(rng: &mut impl Rng) -> Color {
    Color::Rgb(
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn row(time: &str, hex: &str, presence: Option<&str>) -> RawRow {
        let mut row = BTreeMap::new();
        row.insert(COL_TIME.to_string(), time.to_string());
        row.insert(COL_ORIGINAL_HEX.to_string(), hex.to_string());
        if let Some(p) = presence {
            row.insert(COL_PRESENCE.to_string(), p.to_string());
        }
        row
    }

    #[test]
    fn test_presence_defaults_to_one_when_absent() {
        let reading = reading_from_row(&row("2024-05-01T12:00:00Z", "0a", None), "Sensor1");
        assert_eq!(reading.presence, 1.0);
    }

    #[test]
    fn test_presence_defaults_to_one_when_not_numeric() {
        // The pivot leaves an empty cell when the field is missing for a
        // timestamp; that counts as absent too.
        let reading = reading_from_row(&row("2024-05-01T12:00:00Z", "0a", Some("")), "Sensor1");
        assert_eq!(reading.presence, 1.0);
    }

    #[test]
    fn test_presence_kept_when_numeric() {
        let reading = reading_from_row(&row("2024-05-01T12:00:00Z", "0a", Some("0")), "Sensor1");
        assert_eq!(reading.presence, 0.0);
    }

    #[test]
    fn test_unparseable_time_kept_for_table_only() {
        let reading = reading_from_row(&row("not-a-time", "0a", Some("1")), "Sensor1");
        assert!(reading.time.is_none());
        assert_eq!(reading.time_raw, "not-a-time");
    }

    #[test]
    fn test_merge_counts_and_tags() {
        let batches = vec![
            (
                "Sensor1".to_string(),
                vec![
                    row("2024-05-01T12:00:00Z", "0a", Some("1")),
                    row("2024-05-01T12:01:00Z", "0b", Some("0")),
                ],
            ),
            (
                "Sensor2".to_string(),
                vec![row("2024-05-01T12:00:30Z", "0c", None)],
            ),
        ];

        let merged = merge_readings(&batches);
        assert_eq!(merged.len(), 3);
        assert_eq!(
            merged.iter().filter(|r| r.nickname == "Sensor1").count(),
            2
        );
        assert_eq!(
            merged.iter().filter(|r| r.nickname == "Sensor2").count(),
            1
        );
    }

    #[test]
    fn test_chart_groups_one_per_nickname() {
        let batches = vec![
            (
                "Sensor1".to_string(),
                vec![
                    row("2024-05-01T12:00:00Z", "0a", Some("1")),
                    row("2024-05-01T12:01:00Z", "0b", Some("0")),
                ],
            ),
            (
                "Sensor2".to_string(),
                vec![row("2024-05-01T12:00:30Z", "0c", Some("1"))],
            ),
        ];
        let merged = merge_readings(&batches);
        let groups = chart_groups(&merged);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].nickname, "Sensor1");
        assert_eq!(groups[0].points.len(), 2);
        assert_eq!(groups[1].nickname, "Sensor2");
        assert_eq!(groups[1].points.len(), 1);
    }

    #[test]
    fn test_chart_groups_skip_unparseable_times() {
        let readings = merge_readings(&[(
            "Sensor1".to_string(),
            vec![
                row("2024-05-01T12:00:00Z", "0a", Some("1")),
                row("garbage", "0b", Some("1")),
            ],
        )]);
        let groups = chart_groups(&readings);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].points.len(), 1);
    }
}

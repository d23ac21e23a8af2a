//! Scatter chart view.
//!
//! Plots presence (y, beginning at zero) against time (x, unix seconds),
//! one dataset per nickname. Dataset colors are randomized for every fetch
//! cycle when the groups are rebuilt.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::app::App;
use crate::data::ChartGroup;

/// Render the scatter chart.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Presence ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if app.datasets.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No data available for these sensors.",
            Style::default().fg(app.theme.muted),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let ((x_min, x_max), (y_min, y_max)) = bounds(&app.datasets);

    let datasets: Vec<Dataset> = app
        .datasets
        .iter()
        .map(|group| {
            Dataset::default()
                .name(group.nickname.clone())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(group.color))
                .data(&group.points)
        })
        .collect();

    let x_axis = Axis::default()
        .title("Time")
        .style(Style::default().fg(app.theme.border))
        .bounds([x_min, x_max])
        .labels(vec![
            time_label(x_min),
            time_label((x_min + x_max) / 2.0),
            time_label(x_max),
        ]);

    let y_axis = Axis::default()
        .title("Presence")
        .style(Style::default().fg(app.theme.border))
        .bounds([y_min, y_max])
        .labels(vec![
            format!("{y_min:.0}"),
            format!("{:.1}", (y_min + y_max) / 2.0),
            format!("{y_max:.1}"),
        ]);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Compute axis bounds over every group's points.
///
/// The y axis always begins at zero. Degenerate extents (a single point,
/// or all points sharing a coordinate) are padded so the chart stays
/// drawable.
fn bounds(groups: &[ChartGroup]) -> ((f64, f64), (f64, f64)) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_max: f64 = 0.0;

    for group in groups {
        for &(x, y) in &group.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_max = y_max.max(y);
        }
    }

    if x_min >= x_max {
        x_min -= 1.0;
        x_max += 1.0;
    }
    if y_max <= 0.0 {
        y_max = 1.0;
    }

    ((x_min, x_max), (0.0, y_max * 1.1))
}

/// Format a unix-seconds x value as a short timestamp label.
fn time_label(ts: f64) -> String {
    let fmt = format_description!("[day].[month] [hour]:[minute]");
    OffsetDateTime::from_unix_timestamp(ts as i64)
        .ok()
        .and_then(|t| t.format(&fmt).ok())
        .unwrap_or_else(|| format!("{ts:.0}"))
}

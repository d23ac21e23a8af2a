//! Time range form overlay.
//!
//! Two free-text RFC 3339 fields (start, end). Blank fields fall back to the
//! server-side defaults (start of the last year, now).

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, RangeField};
use crate::ui::common::centered_rect;

/// Render the time range form.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.show_range_form {
        return;
    }

    let rect = centered_rect(52, 9, area);

    let block = Block::default()
        .title(" Time Range ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.accent));

    let field_line = |label: &str, value: &str, field: RangeField| {
        let style = if app.range_focus == field {
            app.theme.selected
        } else {
            Style::default()
        };
        let cursor = if app.range_focus == field { "▏" } else { "" };
        Line::from(vec![
            Span::raw(format!("  {label} ")),
            Span::styled(format!("{value}{cursor}"), style),
        ])
    };

    let mut lines = vec![
        field_line("start:", &app.start_input, RangeField::Start),
        Line::from(""),
        field_line("  end:", &app.end_input, RangeField::End),
        Line::from(""),
    ];

    if let Some(error) = &app.form_error {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(app.theme.error),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "  RFC 3339, e.g. 2024-05-01T00:00:00Z. Blank = default.",
            app.theme.tab_inactive,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Enter:apply  Tab:switch field  Esc:cancel",
        app.theme.tab_inactive,
    )));

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

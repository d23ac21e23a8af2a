//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, the blocking
//! warning dialog, and the help overlay.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};
use time::format_description::well_known::Rfc3339;

use crate::app::{App, View};

/// Render the header bar with catalog and window summary.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let window = if app.window.is_unbounded() {
        "last 1y".to_string()
    } else {
        let fmt = |t: Option<time::OffsetDateTime>| {
            t.and_then(|t| t.format(&Rfc3339).ok())
                .unwrap_or_else(|| "default".to_string())
        };
        format!("{} → {}", fmt(app.window.start), fmt(app.window.end))
    };

    let fetch_indicator = if app.fetching {
        Span::styled("fetching… ", Style::default().fg(app.theme.accent))
    } else {
        Span::raw("")
    };

    let line = Line::from(vec![
        Span::styled(
            " SENSORDASH ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(
            format!("{}", app.catalog.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" sensors, "),
        Span::styled(
            format!("{}", app.selected.len()),
            Style::default().fg(app.theme.accent),
        ),
        Span::raw(" selected │ "),
        Span::raw(format!("{} readings │ ", app.readings.len())),
        Span::raw(format!("window: {window} │ ")),
        fetch_indicator,
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Sensors "),
        Line::from(" 2:Chart "),
        Line::from(" 3:Table "),
    ];

    let selected = match app.current_view {
        View::Sensors => 0,
        View::Chart => 1,
        View::Table => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("│");

    frame.render_widget(tabs, area);
}

/// Render the status bar: warnings, errors, transient messages, key hints.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(error) = &app.load_error {
        Line::from(Span::styled(
            format!(" error: {error}"),
            Style::default().fg(app.theme.error),
        ))
    } else if let Some(message) = app.get_status_message() {
        Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(app.theme.accent),
        ))
    } else {
        Line::from(Span::styled(
            " space:select  f:fetch  t:range  r:refresh  tab:view  ?:help  q:quit",
            app.theme.tab_inactive,
        ))
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the blocking warning dialog (dismissed by any key).
pub fn render_warning(frame: &mut Frame, app: &App, area: Rect) {
    let Some(warning) = &app.warning else {
        return;
    };

    let width = (warning.len() as u16 + 6).min(area.width.saturating_sub(4)).max(20);
    let rect = centered_rect(width, 5, area);

    let block = Block::default()
        .title(" Warning ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.warning));

    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(
            warning.as_str(),
            Style::default().fg(app.theme.warning),
        )),
        Line::from(""),
        Line::from(Span::styled("press any key", app.theme.tab_inactive)),
    ])
    .alignment(Alignment::Center)
    .block(block);

    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}

/// Render the help overlay.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let rect = centered_rect(46, 14, area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let lines = vec![
        Line::from("  1/2/3, Tab      switch view"),
        Line::from("  ↑/↓, j/k        move cursor"),
        Line::from("  space           toggle sensor selection"),
        Line::from("  f, Enter        fetch readings now"),
        Line::from("  t               set time range"),
        Line::from("  r               refresh sensor catalog"),
        Line::from("  ?               toggle this help"),
        Line::from("  q               quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  catalog and readings auto-refresh every 60s",
            app.theme.tab_inactive,
        )),
    ];

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

/// A rect of the given size centered within `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

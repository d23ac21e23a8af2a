//! Sensor catalog view with selection.
//!
//! Lists every catalog entry as `Sensor<N> (<id>)`, mirroring the labels the
//! data views use, with a checkbox marker for selection.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the sensor catalog.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Sensors ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if app.catalog.is_empty() {
        let message = match &app.load_error {
            Some(_) => "Catalog unavailable (see status bar)",
            None => "Waiting for sensor catalog…",
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(app.theme.muted),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .catalog
        .iter()
        .map(|entry| {
            let marker = if app.selected.contains(&entry.id) {
                "[x] "
            } else {
                "[ ] "
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(app.theme.accent)),
                Span::styled(
                    entry.nickname.clone(),
                    Style::default().fg(app.theme.accent),
                ),
                Span::raw(format!(" ({})", entry.id)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(app.theme.selected)
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.cursor.min(app.catalog.len().saturating_sub(1))));

    frame.render_stateful_widget(list, area, &mut state);
}

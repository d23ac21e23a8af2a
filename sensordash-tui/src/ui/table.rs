//! Readings table view.
//!
//! One row per merged reading: timestamp (raw, exactly as returned), the
//! opaque hex payload, and the nickname tag.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;

/// Render the readings table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Readings ({}) ", app.readings.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if app.readings.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No data available for these sensors.",
            Style::default().fg(app.theme.muted),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("_time"),
        Cell::from("original_hex"),
        Cell::from("nickname"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = app
        .readings
        .iter()
        .map(|reading| {
            Row::new(vec![
                Cell::from(reading.time_raw.clone()),
                Cell::from(reading.original_hex.clone()),
                Cell::from(Span::styled(
                    reading.nickname.clone(),
                    Style::default().fg(app.theme.accent),
                )),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2), // _time
        Constraint::Fill(2), // original_hex
        Constraint::Fill(1), // nickname
    ];

    let table = Table::new(rows, widths).header(header).block(block);

    frame.render_widget(table, area);
}

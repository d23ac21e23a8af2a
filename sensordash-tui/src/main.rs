use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod client;
mod data;
mod events;
mod ui;
mod worker;

use app::{App, View};
use ui::Theme;
use worker::{FetchCommand, FetchOutcome, FetchWorker};

#[derive(Parser, Debug)]
#[command(name = "sensordash")]
#[command(about = "Terminal dashboard for sensor presence data")]
struct Args {
    /// Base URL of the query proxy
    #[arg(short, long, default_value = "http://localhost:3000")]
    proxy: String,

    /// Auto-refresh interval in seconds (catalog and readings)
    #[arg(short, long, default_value = "60")]
    refresh: u64,

    /// Color theme: auto, dark, or light
    #[arg(long, default_value = "auto")]
    theme: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let theme = match args.theme.as_str() {
        "dark" => Theme::dark(),
        "light" => Theme::light(),
        _ => Theme::auto_detect(),
    };

    let worker = FetchWorker::spawn(&args.proxy);
    let refresh_interval = Duration::from_secs(args.refresh.max(1));

    run_tui(worker, theme, refresh_interval)
}

/// Run the TUI against the spawned fetch worker
fn run_tui(mut worker: FetchWorker, theme: Theme, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and kick off the first catalog fetch
    let mut app = App::new(theme);
    worker.send(FetchCommand::RefreshCatalog);

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &mut worker, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &mut FetchWorker,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_catalog_refresh = Instant::now();
    let mut last_data_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Drain finished fetches before drawing
        while let Some(outcome) = worker.poll() {
            match outcome {
                FetchOutcome::Catalog(Ok(ids)) => app.apply_catalog(ids),
                FetchOutcome::Catalog(Err(error)) => app.catalog_failed(error),
                FetchOutcome::Data(result) => app.apply_data(result),
            }
        }

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Sensors => ui::sensors::render(frame, app, chunks[2]),
                View::Chart => ui::chart::render(frame, app, chunks[2]),
                View::Table => ui::table::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            // Overlays, innermost last
            if app.show_range_form {
                ui::range::render(frame, app, area);
            }
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
            if app.warning.is_some() {
                ui::common::render_warning(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, worker, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh the catalog periodically
        if last_catalog_refresh.elapsed() >= refresh_interval {
            worker.send(FetchCommand::RefreshCatalog);
            last_catalog_refresh = Instant::now();
        }

        // Auto-refresh readings on the same cadence. Without a selection
        // this surfaces the selection warning, same as a manual trigger.
        if last_data_refresh.elapsed() >= refresh_interval {
            if let Some(command) = app.request_fetch() {
                worker.send(command);
            }
            last_data_refresh = Instant::now();
        }
    }

    Ok(())
}

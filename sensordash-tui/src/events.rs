//! Terminal event handling.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, View};
use crate::worker::{FetchCommand, FetchWorker};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event.
///
/// Takes the worker so that fetch triggers (explicit key, form submission)
/// can enqueue work immediately.
pub fn handle_key_event(app: &mut App, worker: &FetchWorker, key: KeyEvent) {
    // A blocking warning eats the next key, like a dismissed alert.
    if app.dismiss_warning() {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If the range form is open, it owns the keyboard
    if app.show_range_form {
        handle_range_form_input(app, worker, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Sensors),
        KeyCode::Char('2') => app.set_view(View::Chart),
        KeyCode::Char('3') => app.set_view(View::Table),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Catalog navigation and selection
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Char(' ') => {
            if app.current_view == View::Sensors {
                app.toggle_selected();
            }
        }

        // Trigger a data fetch cycle
        KeyCode::Char('f') | KeyCode::Enter => {
            if let Some(command) = app.request_fetch() {
                worker.send(command);
            }
        }

        // Refresh the sensor catalog now
        KeyCode::Char('r') => {
            worker.send(FetchCommand::RefreshCatalog);
        }

        // Time-range form
        KeyCode::Char('t') => app.open_range_form(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle key input while the time-range form is open.
fn handle_range_form_input(app: &mut App, worker: &FetchWorker, key: KeyEvent) {
    match key.code {
        // Submit: store the window, then fetch immediately
        KeyCode::Enter => {
            if app.submit_range_form() {
                if let Some(command) = app.request_fetch() {
                    worker.send(command);
                }
            }
        }

        // Cancel without changing the window
        KeyCode::Esc => app.cancel_range_form(),

        // Switch between start and end fields
        KeyCode::Tab | KeyCode::Up | KeyCode::Down => app.next_range_field(),

        KeyCode::Backspace => app.range_pop(),

        KeyCode::Char(c) => app.range_push(c),

        _ => {}
    }
}

//! Application state and the fetch-cycle logic.

use std::collections::HashSet;
use std::time::Instant;

use sensordash_types::TimeRange;

use crate::data::{chart_groups, ChartGroup, Reading};
use crate::ui::Theme;
use crate::worker::FetchCommand;

/// The current view/tab in the TUI.
///
/// The time-range form is shown as an overlay (controlled by
/// `App::show_range_form`) rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Sensor catalog with selection checkboxes.
    Sensors,
    /// Scatter chart of presence over time, grouped by nickname.
    Chart,
    /// Flat readings table (time, original_hex, nickname).
    Table,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Sensors => View::Chart,
            View::Chart => View::Table,
            View::Table => View::Sensors,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Sensors => View::Table,
            View::Chart => View::Sensors,
            View::Table => View::Chart,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Sensors => "Sensors",
            View::Chart => "Chart",
            View::Table => "Table",
        }
    }
}

/// One catalog entry: the opaque identifier plus its positional nickname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorEntry {
    pub id: String,
    /// `Sensor<N>` where N is the 1-based catalog position for this fetch
    /// cycle. Reassigned on every catalog refresh; NOT stable when the
    /// upstream ordering or membership changes.
    pub nickname: String,
}

/// Which field of the time-range form has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeField {
    #[default]
    Start,
    End,
}

/// Main application state.
///
/// Owns the catalog, the selection, the last-submitted time window, and the
/// current merged readings/chart datasets. Re-rendering replaces the owned
/// data wholesale; nothing lives in globals.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_range_form: bool,

    // Catalog
    pub catalog: Vec<SensorEntry>,
    /// Selected sensors, keyed by identifier so a catalog reorder does not
    /// silently change which sensors are selected.
    pub selected: HashSet<String>,
    pub cursor: usize,

    // Current window and readings
    pub window: TimeRange,
    pub readings: Vec<Reading>,
    pub datasets: Vec<ChartGroup>,
    pub fetching: bool,

    // Range form input
    pub start_input: String,
    pub end_input: String,
    pub range_focus: RangeField,
    pub form_error: Option<String>,

    // Feedback
    pub warning: Option<String>,
    pub load_error: Option<String>,
    pub status_message: Option<(String, Instant)>,

    pub theme: Theme,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Sensors,
            show_help: false,
            show_range_form: false,
            catalog: Vec::new(),
            selected: HashSet::new(),
            cursor: 0,
            window: TimeRange::unbounded(),
            readings: Vec::new(),
            datasets: Vec::new(),
            fetching: false,
            start_input: String::new(),
            end_input: String::new(),
            range_focus: RangeField::default(),
            form_error: None,
            warning: None,
            load_error: None,
            status_message: None,
            theme,
        }
    }

    /// Set a temporary status message shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    // --- Catalog -----------------------------------------------------------

    /// Replace the catalog from a fresh `/sensors` response.
    ///
    /// Nicknames are reassigned by position for this fetch cycle. Selections
    /// survive by identifier; identifiers that vanished are dropped.
    pub fn apply_catalog(&mut self, ids: Vec<String>) {
        self.catalog = ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| SensorEntry {
                nickname: format!("Sensor{}", index + 1),
                id,
            })
            .collect();

        let known: HashSet<&str> = self.catalog.iter().map(|e| e.id.as_str()).collect();
        self.selected.retain(|id| known.contains(id.as_str()));

        self.cursor = self.cursor.min(self.catalog.len().saturating_sub(1));
        self.load_error = None;
    }

    /// A catalog refresh failed: record it, keep the previous catalog.
    pub fn catalog_failed(&mut self, error: String) {
        self.load_error = Some(error);
    }

    /// The selected entries, in catalog order (nicknames included).
    pub fn selected_entries(&self) -> Vec<SensorEntry> {
        self.catalog
            .iter()
            .filter(|entry| self.selected.contains(&entry.id))
            .cloned()
            .collect()
    }

    /// Toggle selection of the entry under the cursor.
    pub fn toggle_selected(&mut self) {
        if let Some(entry) = self.catalog.get(self.cursor) {
            if !self.selected.remove(&entry.id) {
                self.selected.insert(entry.id.clone());
            }
        }
    }

    /// Move the catalog cursor down by one.
    pub fn select_next(&mut self) {
        let max = self.catalog.len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(max);
    }

    /// Move the catalog cursor up by one.
    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    // --- Fetch cycle -------------------------------------------------------

    /// Start a data fetch cycle.
    ///
    /// With nothing selected this surfaces a blocking warning and produces
    /// no command at all; a cycle never partially fetches.
    pub fn request_fetch(&mut self) -> Option<FetchCommand> {
        let sensors = self.selected_entries();
        if sensors.is_empty() {
            self.warning = Some("Please select at least one sensor.".to_string());
            return None;
        }

        self.fetching = true;
        Some(FetchCommand::FetchData {
            sensors,
            window: self.window,
        })
    }

    /// Apply the outcome of a data fetch cycle.
    ///
    /// Success with readings replaces the table and chart wholesale; success
    /// with zero readings and any failure both leave the previous output in
    /// place (the cycle is atomic).
    pub fn apply_data(&mut self, outcome: Result<Vec<Reading>, String>) {
        self.fetching = false;
        match outcome {
            Ok(readings) if !readings.is_empty() => {
                self.datasets = chart_groups(&readings);
                self.readings = readings;
                self.load_error = None;
            }
            Ok(_) => {
                self.set_status_message("No data available for these sensors.".to_string());
            }
            Err(error) => {
                self.load_error = Some(error);
            }
        }
    }

    // --- Time-range form ---------------------------------------------------

    /// Open the time-range form overlay.
    pub fn open_range_form(&mut self) {
        self.show_range_form = true;
        self.range_focus = RangeField::Start;
        self.form_error = None;
    }

    /// Close the form without changing the window.
    pub fn cancel_range_form(&mut self) {
        self.show_range_form = false;
        self.form_error = None;
    }

    /// Switch focus between the start and end fields.
    pub fn next_range_field(&mut self) {
        self.range_focus = match self.range_focus {
            RangeField::Start => RangeField::End,
            RangeField::End => RangeField::Start,
        };
    }

    /// Append a character to the focused field.
    pub fn range_push(&mut self, c: char) {
        match self.range_focus {
            RangeField::Start => self.start_input.push(c),
            RangeField::End => self.end_input.push(c),
        }
    }

    /// Remove the last character from the focused field.
    pub fn range_pop(&mut self) {
        match self.range_focus {
            RangeField::Start => {
                self.start_input.pop();
            }
            RangeField::End => {
                self.end_input.pop();
            }
        }
    }

    /// Submit the form: store the window and report whether a fetch should
    /// be triggered. Blank fields mean "server default".
    pub fn submit_range_form(&mut self) -> bool {
        match TimeRange::from_rfc3339(Some(&self.start_input), Some(&self.end_input)) {
            Ok(window) => {
                self.window = window;
                self.show_range_form = false;
                self.form_error = None;
                true
            }
            Err(e) => {
                self.form_error = Some(format!("Invalid RFC 3339 timestamp: {e}"));
                false
            }
        }
    }

    // --- Navigation --------------------------------------------------------

    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Dismiss the blocking warning, if any. Returns true if one was shown.
    pub fn dismiss_warning(&mut self) -> bool {
        self.warning.take().is_some()
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reading_from_row;
    use sensordash_types::RawRow;

    fn app() -> App {
        App::new(Theme::dark())
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_nicknames_assigned_by_position() {
        let mut app = app();
        app.apply_catalog(ids(&["aaa", "bbb", "ccc"]));

        let nicknames: Vec<&str> = app.catalog.iter().map(|e| e.nickname.as_str()).collect();
        assert_eq!(nicknames, vec!["Sensor1", "Sensor2", "Sensor3"]);
    }

    #[test]
    fn test_nicknames_reassigned_on_reorder() {
        let mut app = app();
        app.apply_catalog(ids(&["aaa", "bbb"]));
        assert_eq!(app.catalog[0].id, "aaa");
        assert_eq!(app.catalog[0].nickname, "Sensor1");

        // Same sensors, different upstream ordering: "aaa" is now Sensor2.
        // Positional labels are deliberately unstable across refreshes.
        app.apply_catalog(ids(&["bbb", "aaa"]));
        assert_eq!(app.catalog[0].id, "bbb");
        assert_eq!(app.catalog[0].nickname, "Sensor1");
        assert_eq!(app.catalog[1].id, "aaa");
        assert_eq!(app.catalog[1].nickname, "Sensor2");
    }

    #[test]
    fn test_selection_survives_reorder_by_id() {
        let mut app = app();
        app.apply_catalog(ids(&["aaa", "bbb"]));
        app.cursor = 0;
        app.toggle_selected(); // select "aaa"

        app.apply_catalog(ids(&["bbb", "aaa"]));
        let selected = app.selected_entries();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "aaa");
        assert_eq!(selected[0].nickname, "Sensor2");
    }

    #[test]
    fn test_selection_dropped_when_sensor_vanishes() {
        let mut app = app();
        app.apply_catalog(ids(&["aaa", "bbb"]));
        app.toggle_selected(); // select "aaa"

        app.apply_catalog(ids(&["bbb"]));
        assert!(app.selected_entries().is_empty());
    }

    #[test]
    fn test_catalog_failure_keeps_previous_catalog() {
        let mut app = app();
        app.apply_catalog(ids(&["aaa"]));
        app.catalog_failed("connection refused".to_string());

        assert_eq!(app.catalog.len(), 1);
        assert!(app.load_error.is_some());
    }

    #[test]
    fn test_fetch_without_selection_warns_and_sends_nothing() {
        let mut app = app();
        app.apply_catalog(ids(&["aaa"]));

        let command = app.request_fetch();
        assert!(command.is_none());
        assert!(!app.fetching);
        assert_eq!(
            app.warning.as_deref(),
            Some("Please select at least one sensor.")
        );
    }

    #[test]
    fn test_fetch_with_selection_builds_command() {
        let mut app = app();
        app.apply_catalog(ids(&["aaa", "bbb"]));
        app.toggle_selected();

        let command = app.request_fetch();
        assert!(command.is_some());
        assert!(app.fetching);
        assert!(app.warning.is_none());
        match command.unwrap() {
            FetchCommand::FetchData { sensors, .. } => {
                assert_eq!(sensors.len(), 1);
                assert_eq!(sensors[0].id, "aaa");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn sample_readings() -> Vec<crate::data::Reading> {
        let mut row = RawRow::new();
        row.insert("_time".to_string(), "2024-05-01T12:00:00Z".to_string());
        row.insert("original_hex".to_string(), "0a".to_string());
        vec![reading_from_row(&row, "Sensor1")]
    }

    #[test]
    fn test_failed_cycle_keeps_previous_output() {
        let mut app = app();
        app.apply_data(Ok(sample_readings()));
        assert_eq!(app.readings.len(), 1);
        assert_eq!(app.datasets.len(), 1);

        app.apply_data(Err("boom".to_string()));
        assert_eq!(app.readings.len(), 1);
        assert_eq!(app.datasets.len(), 1);
        assert!(app.load_error.is_some());
    }

    #[test]
    fn test_empty_cycle_keeps_previous_output() {
        let mut app = app();
        app.apply_data(Ok(sample_readings()));
        app.apply_data(Ok(Vec::new()));

        assert_eq!(app.readings.len(), 1);
        assert!(app.get_status_message().is_some());
    }

    #[test]
    fn test_range_form_submit_parses_window() {
        let mut app = app();
        app.open_range_form();
        for c in "2024-05-01T00:00:00Z".chars() {
            app.range_push(c);
        }
        app.next_range_field();
        for c in "2024-05-02T00:00:00Z".chars() {
            app.range_push(c);
        }

        assert!(app.submit_range_form());
        assert!(!app.show_range_form);
        assert!(app.window.start.is_some());
        assert!(app.window.end.is_some());
    }

    #[test]
    fn test_range_form_blank_means_server_default() {
        let mut app = app();
        app.open_range_form();
        assert!(app.submit_range_form());
        assert!(app.window.is_unbounded());
    }

    #[test]
    fn test_range_form_rejects_garbage_and_stays_open() {
        let mut app = app();
        app.open_range_form();
        for c in "yesterday".chars() {
            app.range_push(c);
        }

        assert!(!app.submit_range_form());
        assert!(app.show_range_form);
        assert!(app.form_error.is_some());
    }
}

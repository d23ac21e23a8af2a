//! Terminal UI rendering using ratatui.
//!
//! Each view is implemented in its own submodule with a `render` function:
//!
//! - [`sensors`]: selectable sensor catalog with positional nicknames
//! - [`chart`]: scatter chart of presence over time, one dataset per nickname
//! - [`table`]: flat readings table (time, original_hex, nickname)
//! - [`range`]: time-range form overlay
//! - [`common`]: shared components (header, tabs, status bar, warning, help)
//! - [`theme`]: light/dark theme support with terminal auto-detection

pub mod chart;
pub mod common;
pub mod range;
pub mod sensors;
pub mod table;
pub mod theme;

pub use theme::Theme;

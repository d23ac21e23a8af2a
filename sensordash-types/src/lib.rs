//! # sensordash-types
//!
//! Shared wire types for the sensordash proxy and dashboard client.
//!
//! The proxy and the TUI are coupled only through two HTTP contracts:
//!
//! - `GET /sensors` → a JSON array of sensor identifier strings
//! - `GET /sensor-data/:sensor_id` → a JSON array of [`RawRow`] objects
//!
//! This crate defines those payloads plus the time-window parameters the
//! client sends along with a data request. The proxy performs no type
//! coercion: a [`RawRow`] carries every value as the literal string it
//! appeared as in the upstream CSV, and numeric interpretation is left to
//! the consumer (the dashboard crate's `Reading`).

mod range;
mod row;

pub use range::*;
pub use row::*;

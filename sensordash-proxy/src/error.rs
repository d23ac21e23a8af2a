//! Error types for the proxy.

use thiserror::Error;

/// Errors that can occur while serving a proxied query.
///
/// Every variant collapses to a `500` with an [`ErrorBody`] payload at the
/// HTTP surface; the distinction only matters for logging and tests.
///
/// [`ErrorBody`]: sensordash_types::ErrorBody
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The upstream database could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The upstream request failed in transit.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The upstream database answered with a non-success status.
    #[error("HTTP error! Status: {status} - {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The upstream CSV did not have the expected shape.
    #[error("Failed to parse CSV response: {0}")]
    Csv(String),

    /// The sensor identifier failed allow-list validation.
    #[error("Invalid sensor identifier: {0}")]
    InvalidSensorId(String),

    /// The upstream request timed out.
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::Timeout
        } else if err.is_connect() {
            ProxyError::Connection(err.to_string())
        } else {
            ProxyError::Http(err.to_string())
        }
    }
}

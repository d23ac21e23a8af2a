//! HTTP client for the proxy endpoints.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use sensordash_types::{ErrorBody, RawRow, TimeRange};
use time::format_description::well_known::Rfc3339;

/// Client for the two dashboard endpoints exposed by the proxy.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    /// Create a client for the given proxy base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Fetch the sensor catalog, in proxy (= upstream) order.
    pub async fn sensors(&self) -> Result<Vec<String>> {
        let url = format!("{}/sensors", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch sensors")?;

        if !response.status().is_success() {
            bail!("Failed to fetch sensors: {}", error_detail(response).await);
        }

        response
            .json()
            .await
            .context("Failed to parse sensor list")
    }

    /// Fetch the readings for one sensor over the given window.
    ///
    /// Bounds are only sent when both are present; otherwise the proxy's
    /// default window applies.
    pub async fn sensor_data(&self, sensor_id: &str, window: &TimeRange) -> Result<Vec<RawRow>> {
        let url = format!("{}/sensor-data/{}", self.base_url, percent_encode(sensor_id));
        let mut request = self.client.get(&url);

        if let (Some(start), Some(end)) = (window.start, window.end) {
            request = request.query(&[
                ("start", start.format(&Rfc3339)?),
                ("end", end.format(&Rfc3339)?),
            ]);
        }

        let response = request
            .send()
            .await
            .context("Failed to fetch sensor data")?;

        if !response.status().is_success() {
            bail!(
                "Failed to fetch sensor data: {}",
                error_detail(response).await
            );
        }

        response
            .json()
            .await
            .context("Failed to parse sensor data")
    }
}

/// Pull the proxy's error body out of a failure response, falling back to
/// the raw body text.
async fn error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => format!("{} ({})", body.details, status),
        Err(_) => format!("{} ({})", text, status),
    }
}

/// Percent-encode a path segment.
///
/// Identifiers are opaque strings; anything outside the unreserved set is
/// escaped so it survives the URL path.
fn percent_encode(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_encode_passes_unreserved() {
        assert_eq!(percent_encode("sensor-a_1.x~"), "sensor-a_1.x~");
    }

    #[test]
    fn test_percent_encode_escapes_the_rest() {
        assert_eq!(percent_encode("AB:CD"), "AB%3ACD");
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("x/y"), "x%2Fy");
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = ProxyClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}

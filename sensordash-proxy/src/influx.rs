//! InfluxDB v2 query client.
//!
//! Sends Flux over the `/api/v2/query` HTTP API and translates the annotated
//! CSV responses into the JSON shapes the dashboard consumes. The client is
//! immutable after construction and safe to share across requests.

use std::time::Duration;

use reqwest::Client;
use sensordash_types::{RawRow, TimeRange, COL_SENSOR_ID};

use crate::csv;
use crate::error::ProxyError;
use crate::flux;
use crate::settings::Influx;

/// Client for the upstream time-series database.
#[derive(Debug, Clone)]
pub struct InfluxClient {
    client: Client,
    url: String,
    org: String,
    bucket: String,
    token: String,
    measurement: String,
}

impl InfluxClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> InfluxClientBuilder {
        InfluxClientBuilder::default()
    }

    /// Build a client from loaded settings.
    pub fn from_settings(settings: &Influx) -> Self {
        Self::builder()
            .url(&settings.url)
            .org(&settings.org)
            .bucket(&settings.bucket)
            .token(&settings.token)
            .measurement(&settings.measurement)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
    }

    /// Fetch the distinct sensor identifiers seen in the last year.
    ///
    /// Order is whatever the upstream returned; the dashboard's positional
    /// nicknames depend on it.
    pub async fn list_sensors(&self) -> Result<Vec<String>, ProxyError> {
        let query = flux::list_sensors_query(&self.bucket, &self.measurement);
        let text = self.query(&query).await?;
        csv::parse_column(&text, COL_SENSOR_ID)
    }

    /// Fetch the pivoted readings for one sensor over the given window.
    ///
    /// A window with zero matching rows yields an empty list.
    pub async fn sensor_readings(
        &self,
        sensor_id: &str,
        range: &TimeRange,
    ) -> Result<Vec<RawRow>, ProxyError> {
        let query =
            flux::sensor_readings_query(&self.bucket, &self.measurement, sensor_id, range)?;
        let text = self.query(&query).await?;
        csv::parse_rows(&text)
    }

    /// POST a Flux query and return the raw CSV body.
    ///
    /// The body is read regardless of status so a failure response can be
    /// surfaced in the error detail.
    async fn query(&self, flux: &str) -> Result<String, ProxyError> {
        tracing::debug!(query = flux, "sending flux query");

        let response = self
            .client
            .post(format!("{}/api/v2/query", self.url))
            .query(&[("org", self.org.as_str())])
            .header("Authorization", format!("Token {}", self.token))
            .header("Content-Type", "application/vnd.flux")
            .header("Accept", "application/csv")
            .body(flux.to_string())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        tracing::debug!(bytes = text.len(), "received csv response");
        Ok(text)
    }
}

/// Builder for [`InfluxClient`].
#[derive(Debug, Default)]
pub struct InfluxClientBuilder {
    url: Option<String>,
    org: Option<String>,
    bucket: Option<String>,
    token: Option<String>,
    measurement: Option<String>,
    timeout: Option<Duration>,
}

impl InfluxClientBuilder {
    /// Set the base URL of the query API (e.g. "http://localhost:8086").
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the organization the queries run against.
    pub fn org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    /// Set the bucket the queries select from.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set the API token used for authentication.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the measurement name identifying sensor records (default:
    /// "sensor_data").
    pub fn measurement(mut self, measurement: impl Into<String>) -> Self {
        self.measurement = Some(measurement.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> InfluxClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        InfluxClient {
            client,
            url: self
                .url
                .unwrap_or_else(|| "http://localhost:8086".to_string()),
            org: self.org.unwrap_or_default(),
            bucket: self.bucket.unwrap_or_default(),
            token: self.token.unwrap_or_default(),
            measurement: self
                .measurement
                .unwrap_or_else(|| "sensor_data".to_string()),
        }
    }
}

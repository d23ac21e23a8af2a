//! HTTP handlers for the two proxy endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sensordash_types::{ErrorBody, RawRow, TimeRange};

use crate::error::ProxyError;
use crate::influx::InfluxClient;

#[derive(Clone)]
pub struct ProxyState {
    pub influx: Arc<InfluxClient>,
}

/// A failed request: the operation label plus the underlying error.
///
/// Every failure collapses to `500 {error, details}`; upstream trouble and
/// malformed CSV are not distinguished at the HTTP surface.
pub struct ApiError {
    operation: &'static str,
    source: ProxyError,
}

impl ApiError {
    fn new(operation: &'static str, source: ProxyError) -> Self {
        Self { operation, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.source, "{}", self.operation);
        let body = ErrorBody::new(self.operation, self.source.to_string());
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// `GET /sensors` — the sensor catalog, in upstream order.
pub async fn get_sensors(
    State(state): State<ProxyState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let sensors = state
        .influx
        .list_sensors()
        .await
        .map_err(|e| ApiError::new("Error fetching sensor IDs", e))?;

    Ok(Json(sensors))
}

/// `GET /sensor-data/:sensor_id` — pivoted readings for one sensor.
///
/// The path parameter arrives percent-decoded; `start`/`end` are optional
/// RFC 3339 query parameters, each defaulting independently when absent.
pub async fn get_sensor_data(
    Path(sensor_id): Path<String>,
    Query(range): Query<TimeRange>,
    State(state): State<ProxyState>,
) -> Result<Json<Vec<RawRow>>, ApiError> {
    let rows = state
        .influx
        .sensor_readings(&sensor_id, &range)
        .await
        .map_err(|e| ApiError::new("Error querying sensor data", e))?;

    Ok(Json(rows))
}

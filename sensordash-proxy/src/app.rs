//! Router construction.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{get_sensor_data, get_sensors, ProxyState};
use crate::influx::InfluxClient;
use crate::settings::Settings;

/// Build the router from loaded settings.
pub fn create_app(settings: &Settings) -> Router {
    let influx = Arc::new(InfluxClient::from_settings(&settings.influx));
    create_app_with_client(influx)
}

/// Build the router around an existing upstream client.
///
/// Split out from [`create_app`] so tests can point the proxy at a stub
/// upstream. The CORS layer is deliberately open: the dashboard may be
/// served from any origin.
pub fn create_app_with_client(influx: Arc<InfluxClient>) -> Router {
    Router::new()
        .route("/sensors", get(get_sensors))
        .route("/sensor-data/:sensor_id", get(get_sensor_data))
        .with_state(ProxyState { influx })
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

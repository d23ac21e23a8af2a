//! # sensordash-proxy
//!
//! Stateless HTTP proxy between the dashboard and a hosted InfluxDB v2
//! instance. Two endpoints, one outbound Flux query each:
//!
//! - `GET /sensors` → distinct sensor identifiers (JSON array of strings)
//! - `GET /sensor-data/:sensor_id?start&end` → pivoted readings (JSON array
//!   of objects keyed by the upstream CSV header)
//!
//! No state is held between requests, so any number of requests may be
//! served concurrently without coordination.

use std::net::{IpAddr, SocketAddr};

use tokio::net::TcpListener;

use crate::app::create_app;
use crate::settings::Settings;

pub mod app;
pub mod csv;
pub mod error;
pub mod flux;
pub mod handlers;
pub mod influx;
pub mod settings;

pub async fn run(settings: &Settings) {
    let app = create_app(settings);

    let ip_addr = settings
        .server
        .host
        .parse::<IpAddr>()
        .expect("Invalid server host address.");

    let address = SocketAddr::from((ip_addr, settings.server.port));

    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind server address.");

    tracing::info!("listening on {:?}", address);

    axum::serve(listener, app).await.expect("Server error.");
}

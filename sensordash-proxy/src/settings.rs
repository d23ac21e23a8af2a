//! Configuration loading.
//!
//! Settings are layered: `configs/default`, then an optional
//! `configs/{RUN_MODE}` overlay, then environment variables (so the upstream
//! token can be supplied as `INFLUX_TOKEN` instead of living in a file).

use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

/// Connection settings for the upstream time-series database.
///
/// The token, org, and bucket are deployment configuration; nothing in this
/// crate embeds them as constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Influx {
    pub url: String,
    pub org: String,
    pub bucket: String,
    pub token: String,
    #[serde(default = "default_measurement")]
    pub measurement: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_measurement() -> String {
    "sensor_data".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub influx: Influx,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::default().separator("_"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_fields() {
        let influx: Influx = serde_json::from_str(
            r#"{"url":"http://localhost:8086","org":"o","bucket":"b","token":"t"}"#,
        )
        .unwrap();
        assert_eq!(influx.measurement, "sensor_data");
        assert_eq!(influx.timeout_secs, 10);
    }
}

//! Background fetch worker.
//!
//! All network I/O runs on a dedicated tokio runtime in a background thread.
//! The UI loop stays synchronous: it sends [`FetchCommand`]s and drains
//! [`FetchOutcome`]s without blocking on every tick. In-flight fetches are
//! never cancelled; if triggers overlap, outcomes arrive in order and the
//! last one applied wins the UI update.

use std::thread;

use anyhow::{Context, Result};
use sensordash_types::TimeRange;
use tokio::sync::mpsc;

use crate::app::SensorEntry;
use crate::client::ProxyClient;
use crate::data::{merge_readings, Reading};

/// Work for the fetch thread.
#[derive(Debug)]
pub enum FetchCommand {
    /// Re-fetch the sensor catalog.
    RefreshCatalog,
    /// Run one data fetch cycle over the given sensors and window.
    FetchData {
        sensors: Vec<SensorEntry>,
        window: TimeRange,
    },
}

/// Result of one command, in command order.
#[derive(Debug)]
pub enum FetchOutcome {
    Catalog(Result<Vec<String>, String>),
    Data(Result<Vec<Reading>, String>),
}

/// Handle to the background fetch thread.
pub struct FetchWorker {
    commands: mpsc::UnboundedSender<FetchCommand>,
    outcomes: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl FetchWorker {
    /// Spawn the worker against the given proxy base URL.
    pub fn spawn(proxy_url: &str) -> Self {
        let (command_tx, mut command_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let url = proxy_url.to_string();

        thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("Failed to build tokio runtime");
            rt.block_on(async move {
                let client = ProxyClient::new(url);

                while let Some(command) = command_rx.recv().await {
                    let outcome = match command {
                        FetchCommand::RefreshCatalog => FetchOutcome::Catalog(
                            client.sensors().await.map_err(|e| format!("{e:#}")),
                        ),
                        FetchCommand::FetchData { sensors, window } => FetchOutcome::Data(
                            fetch_cycle(&client, &sensors, &window)
                                .await
                                .map_err(|e| format!("{e:#}")),
                        ),
                    };

                    if outcome_tx.send(outcome).is_err() {
                        // UI gone, shut down
                        break;
                    }
                }
            });
        });

        Self {
            commands: command_tx,
            outcomes: outcome_rx,
        }
    }

    /// Queue a command for the worker.
    pub fn send(&self, command: FetchCommand) {
        let _ = self.commands.send(command);
    }

    /// Poll for a finished outcome without blocking.
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        self.outcomes.try_recv().ok()
    }
}

/// One data fetch cycle: per-sensor requests run sequentially and the first
/// failure aborts the whole cycle, so the UI never renders a partial merge.
pub async fn fetch_cycle(
    client: &ProxyClient,
    sensors: &[SensorEntry],
    window: &TimeRange,
) -> Result<Vec<Reading>> {
    let mut batches = Vec::with_capacity(sensors.len());

    for entry in sensors {
        let rows = client
            .sensor_data(&entry.id, window)
            .await
            .with_context(|| format!("Failed to fetch sensor data for {}", entry.id))?;

        batches.push((entry.nickname.clone(), rows));
    }

    Ok(merge_readings(&batches))
}

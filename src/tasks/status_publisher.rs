//! Status publisher background task

use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::state::CountdownTimer;

/// Outbound channel for remaining-time reports.
///
/// Publishing is best effort: an error is logged by the caller and the
/// report is dropped.
pub trait StatusSink: Send + Sync {
    fn publish(&self, payload: String) -> Result<(), String>;
}

/// Format the remaining seconds the way they go out on the wire
pub fn status_payload(remaining_seconds: u64) -> String {
    format!("{}\n", remaining_seconds)
}

/// Periodically reports the remaining seconds to a [`StatusSink`]
pub struct StatusPublisher {
    timer: Arc<CountdownTimer>,
    sink: Arc<dyn StatusSink>,
    period: Duration,
}

impl StatusPublisher {
    pub fn new(timer: Arc<CountdownTimer>, sink: Arc<dyn StatusSink>, period: Duration) -> Self {
        Self { timer, sink, period }
    }

    /// Publish forever
    pub async fn run(self) {
        info!("Starting status publisher task");
        loop {
            self.tick().await;
        }
    }

    /// Publish a bounded number of times
    pub async fn run_ticks(&self, ticks: u64) {
        for _ in 0..ticks {
            self.tick().await;
        }
    }

    async fn tick(&self) {
        sleep(self.period).await;

        let snapshot = match self.timer.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Failed to read timer for status: {}", e);
                return;
            }
        };

        if let Err(e) = self.sink.publish(status_payload(snapshot.remaining_seconds)) {
            warn!("Failed to publish status: {}", e);
        }
    }
}

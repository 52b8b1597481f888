//! Countdown background task

use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{error, info};

use crate::state::CountdownTimer;

/// The one-second decrement loop.
///
/// Creating it forces the latch off, so it must be created before anything
/// else can adjust the timer.
#[derive(Debug)]
pub struct CountdownLoop {
    timer: Arc<CountdownTimer>,
    period: Duration,
}

impl CountdownLoop {
    /// Force the latch off and prepare the loop
    pub fn start(timer: Arc<CountdownTimer>, period: Duration) -> Self {
        info!("Starting countdown task");
        if let Err(e) = timer.force_latch_off() {
            error!("Failed to switch latch off at startup: {}", e);
        }
        Self { timer, period }
    }

    /// Tick forever
    pub async fn run(self) {
        loop {
            self.tick().await;
        }
    }

    /// Tick a bounded number of times
    pub async fn run_ticks(&self, ticks: u64) {
        for _ in 0..ticks {
            self.tick().await;
        }
    }

    async fn tick(&self) {
        sleep(self.period).await;
        if let Err(e) = self.timer.decrement_one() {
            error!("Failed to decrement timer: {}", e);
        }
    }
}

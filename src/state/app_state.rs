//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::warn;

use super::{CountdownTimer, TimerSnapshot};

/// Application state shared by the tasks, the MQTT event loop and the HTTP API
#[derive(Debug)]
pub struct AppState {
    /// The single countdown driving the latch
    pub timer: Arc<CountdownTimer>,
    /// Seconds added by an empty command message
    pub default_added_seconds: i64,
    /// Process metadata
    pub start_time: Instant,
    /// Last applied command tracking
    pub last_command: Arc<Mutex<Option<String>>>,
    pub last_command_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState around an existing timer
    pub fn new(timer: Arc<CountdownTimer>, default_added_seconds: i64) -> Self {
        Self {
            timer,
            default_added_seconds,
            start_time: Instant::now(),
            last_command: Arc::new(Mutex::new(None)),
            last_command_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Remember the most recently applied command
    pub fn record_command(&self, description: String) {
        match self.last_command.lock() {
            Ok(mut last_command) => *last_command = Some(description),
            Err(e) => warn!("Failed to record last command: {}", e),
        }
        if let Ok(mut last_time) = self.last_command_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last command information
    pub fn get_last_command(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_command = self.last_command.lock().ok().and_then(|c| c.clone());
        let last_command_time = self.last_command_time.lock().ok().and_then(|t| *t);
        (last_command, last_command_time)
    }

    /// Get the current timer snapshot
    pub fn get_timer_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.timer.snapshot()
    }

    /// Calculate process uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

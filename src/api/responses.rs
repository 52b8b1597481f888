//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// API response structure for the adjust endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub remaining_seconds: u64,
}

impl AdjustResponse {
    /// Create a new adjust response
    pub fn new(status: &str, message: String, remaining_seconds: u64) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            remaining_seconds,
        }
    }

    /// Create a response for an applied command
    pub fn applied(message: String, remaining_seconds: u64) -> Self {
        Self::new("applied", message, remaining_seconds)
    }

    /// Create a response for a discarded command
    pub fn ignored(message: String, remaining_seconds: u64) -> Self {
        Self::new("ignored", message, remaining_seconds)
    }
}

/// Status response with timer information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub remaining_seconds: u64,
    pub max_seconds: u64,
    pub latch_energized: bool,
    pub uptime: String,
    pub last_command: Option<String>,
    pub last_command_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

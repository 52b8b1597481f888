//! Relay Timer - an MQTT-driven countdown that keeps a relay latch energized
//!
//! Remote commands add or subtract time from a single countdown. While time
//! remains the latch is on; when it reaches zero the latch is switched off.
//! The remaining time is reported back over MQTT every second.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod hardware;
pub mod mqtt;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, RelayError};
pub use state::{AppState, CountdownTimer};
pub use api::create_router;
pub use utils::signals::shutdown_signal;

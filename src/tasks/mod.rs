//! Background tasks module
//!
//! This module contains the periodic tasks that run alongside the MQTT
//! event loop: the one-second countdown and the status publisher.

pub mod countdown;
pub mod status_publisher;

/// Interval between countdown and status ticks
pub const TICK_PERIOD: std::time::Duration = std::time::Duration::from_secs(1);

// Re-export main types
pub use countdown::CountdownLoop;
pub use status_publisher::{StatusPublisher, StatusSink};

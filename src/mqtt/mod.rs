//! MQTT transport module
//!
//! Connects to the broker, feeds command messages to the dispatcher and
//! carries status reports back out.

pub mod client;
pub mod link;
pub mod sink;

// Re-export main functions
pub use client::{connect, connect_within, mqtt_event_task};
pub use link::BrokerLink;
pub use sink::MqttStatusSink;

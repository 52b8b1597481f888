//! Error kinds for startup and runtime failures

use std::time::Duration;

use thiserror::Error;

/// Invalid command line configuration, detected before any hardware or
/// network resource is touched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid MQTT port {0}, must be at most 65535")]
    InvalidPort(u32),

    #[error("invalid GPIO line number {0}, must be a non-negative line offset")]
    InvalidGpioLine(i64),

    #[error("invalid default added seconds duration {0}, must not be negative")]
    NegativeDefaultDuration(i64),

    #[error("maximum timer seconds must be greater than zero")]
    ZeroMaxSeconds,
}

/// Fatal conditions that terminate the controller
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to request GPIO line {line} on {chip}: {source}")]
    Gpio {
        chip: String,
        line: u32,
        #[source]
        source: gpio_cdev::Error,
    },

    #[error("timed out after {0:?} connecting to MQTT broker")]
    ConnectTimeout(Duration),

    #[error("failed to connect to MQTT broker: {0}")]
    Connect(#[source] rumqttc::ConnectionError),

    #[error("timed out after {timeout:?} subscribing to topic {topic}")]
    SubscribeTimeout { topic: String, timeout: Duration },

    #[error("broker rejected subscription to topic {0}")]
    SubscribeRejected(String),

    #[error("failed to subscribe: {0}")]
    Subscribe(#[from] rumqttc::ClientError),

    #[error("connection lost from MQTT broker: {0}")]
    ConnectionLost(#[source] rumqttc::ConnectionError),

    #[error("HTTP status server failed: {0}")]
    Http(#[from] std::io::Error),
}

//! Configuration and CLI argument handling

use clap::{Parser, ValueEnum};

use crate::{error::ConfigError, hardware::Polarity};

/// What to do when the broker connection drops after startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConnectionLostPolicy {
    /// Force the latch off and terminate the process
    Abort,
    /// Log the loss and let the client reconnect, leaving the latch as is
    Reconnect,
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "relay-timer")]
#[command(about = "An MQTT-driven countdown timer that keeps a GPIO relay latch energized")]
#[command(version = "1.0.0")]
pub struct Config {
    /// MQTT Broker hostname/IP
    #[arg(long, default_value = "127.0.0.1")]
    pub mqtt_broker: String,

    /// MQTT Broker Port
    #[arg(long, default_value = "1883")]
    pub mqtt_port: u32,

    /// MQTT Topic to subscribe for timer commands
    #[arg(long, default_value = "test-topic")]
    pub mqtt_topic: String,

    /// MQTT Topic to publish the remaining seconds to
    #[arg(long, default_value = "test-alert-topic")]
    pub mqtt_alert_topic: String,

    /// MQTT Broker username
    #[arg(long, default_value = "")]
    pub mqtt_username: String,

    /// MQTT Broker password
    #[arg(long, default_value = "")]
    pub mqtt_password: String,

    /// GPIO chip name (e.g. gpiochip0) or device path
    #[arg(long, default_value = "gpiochip0")]
    pub gpio_chip: String,

    /// GPIO chip line driving the latch
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub gpio_chip_line: i64,

    /// Latch is active-high triggered
    #[arg(long)]
    pub active_high: bool,

    /// Seconds added when an empty command message arrives
    #[arg(long, default_value = "1800", allow_hyphen_values = true)]
    pub default_added_seconds_duration: i64,

    /// Upper bound of the countdown in seconds
    #[arg(long, default_value = "7200")]
    pub max_seconds: u64,

    /// Behaviour when the broker connection is lost
    #[arg(long, value_enum, default_value = "abort")]
    pub on_connection_lost: ConnectionLostPolicy,

    /// Serve the local HTTP status API on this port
    #[arg(long)]
    pub http_port: Option<u16>,

    /// Host address for the HTTP status API
    #[arg(long, default_value = "127.0.0.1")]
    pub http_host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Check every numeric setting, reporting the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt_port > u32::from(u16::MAX) {
            return Err(ConfigError::InvalidPort(self.mqtt_port));
        }
        if self.gpio_chip_line < 0 || self.gpio_chip_line > i64::from(u32::MAX) {
            return Err(ConfigError::InvalidGpioLine(self.gpio_chip_line));
        }
        if self.default_added_seconds_duration < 0 {
            return Err(ConfigError::NegativeDefaultDuration(
                self.default_added_seconds_duration,
            ));
        }
        if self.max_seconds == 0 {
            return Err(ConfigError::ZeroMaxSeconds);
        }
        Ok(())
    }

    /// Broker port, only meaningful after `validate`
    pub fn broker_port(&self) -> u16 {
        u16::try_from(self.mqtt_port).unwrap_or(u16::MAX)
    }

    /// GPIO line offset, only meaningful after `validate`
    pub fn gpio_line(&self) -> u32 {
        u32::try_from(self.gpio_chip_line).unwrap_or_default()
    }

    /// Wiring polarity of the latch output
    pub fn polarity(&self) -> Polarity {
        if self.active_high {
            Polarity::ActiveHigh
        } else {
            Polarity::ActiveLow
        }
    }

    /// Get the HTTP status API address, if enabled
    pub fn http_address(&self) -> Option<String> {
        self.http_port
            .map(|port| format!("{}:{}", self.http_host, port))
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

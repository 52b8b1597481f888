//! Relay Timer - an MQTT-driven countdown that keeps a relay latch energized
//!
//! This is the main entry point for the relay-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use relay_timer::{
    config::Config,
    create_router,
    error::RelayError,
    hardware::{CdevOutputLine, LatchController},
    mqtt::{connect, mqtt_event_task, BrokerLink, MqttStatusSink},
    shutdown_signal,
    state::{AppState, CountdownTimer},
    tasks::{CountdownLoop, StatusPublisher, TICK_PERIOD},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("relay_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting relay-timer v{}", env!("CARGO_PKG_VERSION"));
    config.validate()?;
    info!(
        "Configuration: broker={}:{}, topic={}, alert_topic={}, gpio={}:{}, polarity={:?}, default={}s, max={}s, on_connection_lost={:?}",
        config.mqtt_broker, config.mqtt_port, config.mqtt_topic, config.mqtt_alert_topic,
        config.gpio_chip, config.gpio_chip_line, config.polarity(),
        config.default_added_seconds_duration, config.max_seconds, config.on_connection_lost
    );

    // Request the latch line already de-energized
    let polarity = config.polarity();
    let line = CdevOutputLine::request(&config.gpio_chip, config.gpio_line(), polarity.level(false))?;
    let latch = LatchController::new(line, polarity);

    // Create the countdown and application state
    let timer = Arc::new(CountdownTimer::new(config.max_seconds, Box::new(latch)));
    let state = Arc::new(AppState::new(
        Arc::clone(&timer),
        config.default_added_seconds_duration,
    ));

    // The latch is forced off here, before any command can arrive
    let countdown = CountdownLoop::start(Arc::clone(&timer), TICK_PERIOD);
    tokio::spawn(countdown.run());

    let (client, eventloop) = match connect(&config, &state).await {
        Ok(session) => session,
        Err(e) => {
            // Commands may have switched the latch on during the handshake
            if let Err(e) = timer.force_latch_off() {
                error!("Failed to switch latch off: {}", e);
            }
            return Err(e.into());
        }
    };

    // Start reporting the remaining time
    let link = BrokerLink::new(true);
    let sink = Arc::new(MqttStatusSink::new(
        client.clone(),
        config.mqtt_alert_topic.clone(),
        link.clone(),
    ));
    let publisher = StatusPublisher::new(Arc::clone(&timer), sink, TICK_PERIOD);
    tokio::spawn(publisher.run());

    let events = mqtt_event_task(
        eventloop,
        client,
        Arc::clone(&state),
        config.mqtt_topic.clone(),
        config.on_connection_lost,
        link,
    );

    // Optional local HTTP status API
    let http_address = config.http_address();
    let http_state = Arc::clone(&state);
    let http = async move {
        match http_address {
            Some(addr) => {
                let listener = TcpListener::bind(&addr).await?;
                info!("HTTP status API running on http://{}", addr);
                info!("  GET  /status - Remaining time and latch state");
                info!("  GET  /health - Health check");
                info!("  POST /adjust - Apply a timer command");
                axum::serve(listener, create_router(http_state)).await?;
                Ok::<(), RelayError>(())
            }
            None => std::future::pending().await,
        }
    };

    let outcome: anyhow::Result<()> = tokio::select! {
        result = events => result.map_err(Into::into),
        result = http => result.map_err(Into::into),
        result = shutdown_signal() => {
            info!("Shutdown signal received");
            result.map_err(Into::into)
        }
    };

    // Every exit path leaves the relay de-energized
    if let Err(e) = timer.force_latch_off() {
        error!("Failed to switch latch off on exit: {}", e);
    }

    info!("Relay timer stopped");
    outcome
}

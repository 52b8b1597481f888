//! Broker connection, subscription handshake and event loop

use std::{sync::Arc, time::Duration};
use rumqttc::{
    AsyncClient, Event, EventLoop, MqttOptions, Packet, Publish, QoS, SubscribeReasonCode,
};
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use super::BrokerLink;
use crate::{
    commands::dispatch_command,
    config::{Config, ConnectionLostPolicy},
    error::RelayError,
    state::AppState,
};

/// Bound on each of the connect and subscribe handshakes
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
const KEEP_ALIVE: Duration = Duration::from_secs(10);
const RECONNECT_DELAY: Duration = Duration::from_secs(1);
/// Depth of the client's outgoing request queue
pub const REQUEST_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handshake {
    ConnAck,
    SubAck,
}

/// Build client options from the configuration, with a random client id
pub fn mqtt_options(config: &Config) -> MqttOptions {
    let client_id = format!("mqtt-relay-module-timer-{}", rand::random::<u32>());
    info!(
        "Connecting to {}:{}, with client id of {}",
        config.mqtt_broker, config.broker_port(), client_id
    );

    let mut options = MqttOptions::new(client_id, config.mqtt_broker.clone(), config.broker_port());
    options.set_keep_alive(KEEP_ALIVE);
    if !config.mqtt_username.is_empty() {
        options.set_credentials(config.mqtt_username.clone(), config.mqtt_password.clone());
    }
    options
}

/// Connect and subscribe to the command topic, each step bounded by
/// [`HANDSHAKE_TIMEOUT`].
///
/// Commands that arrive during the handshake are dispatched right away.
pub async fn connect(
    config: &Config,
    state: &AppState,
) -> Result<(AsyncClient, EventLoop), RelayError> {
    connect_within(config, state, HANDSHAKE_TIMEOUT).await
}

/// [`connect`] with an explicit bound on each handshake step
pub async fn connect_within(
    config: &Config,
    state: &AppState,
    handshake_timeout: Duration,
) -> Result<(AsyncClient, EventLoop), RelayError> {
    let (client, mut eventloop) = AsyncClient::new(mqtt_options(config), REQUEST_CAPACITY);
    let topic = config.mqtt_topic.as_str();

    timeout(handshake_timeout, await_handshake(&mut eventloop, state, topic, Handshake::ConnAck))
        .await
        .map_err(|_| RelayError::ConnectTimeout(handshake_timeout))??;
    info!("Connected to MQTT broker");

    client.subscribe(topic, QoS::AtLeastOnce).await?;
    timeout(handshake_timeout, await_handshake(&mut eventloop, state, topic, Handshake::SubAck))
        .await
        .map_err(|_| RelayError::SubscribeTimeout {
            topic: topic.to_string(),
            timeout: handshake_timeout,
        })??;
    info!("Subscribed to topic {}", topic);

    Ok((client, eventloop))
}

async fn await_handshake(
    eventloop: &mut EventLoop,
    state: &AppState,
    topic: &str,
    wanted: Handshake,
) -> Result<(), RelayError> {
    loop {
        match eventloop.poll().await.map_err(RelayError::Connect)? {
            Event::Incoming(Packet::ConnAck(_)) if wanted == Handshake::ConnAck => return Ok(()),
            Event::Incoming(Packet::SubAck(ack)) if wanted == Handshake::SubAck => {
                if ack.return_codes.iter().any(|c| matches!(c, SubscribeReasonCode::Failure)) {
                    return Err(RelayError::SubscribeRejected(topic.to_string()));
                }
                return Ok(());
            }
            Event::Incoming(Packet::Publish(publish)) => handle_publish(state, &publish),
            event => debug!("MQTT handshake event: {:?}", event),
        }
    }
}

fn handle_publish(state: &AppState, publish: &Publish) {
    let source = format!("topic: {}", publish.topic);
    if let Err(e) = dispatch_command(state, &source, &publish.payload) {
        error!("Failed to apply command: {}", e);
    }
}

/// Queue a subscription from outside the event loop.
///
/// The request queue may still be full of work from before an outage and
/// only the event loop drains it, so the send has to wait elsewhere.
fn renew_subscription(client: &AsyncClient, topic: &str) {
    let client = client.clone();
    let topic = topic.to_string();
    tokio::spawn(async move {
        match client.subscribe(topic.as_str(), QoS::AtLeastOnce).await {
            Ok(()) => debug!("Subscription to topic {} queued", topic),
            Err(e) => error!("Failed to resubscribe to topic {}: {}", topic, e),
        }
    });
}

/// Drive the MQTT connection after startup.
///
/// `link` tracks whether the broker is reachable. Returns only when the
/// connection is lost under [`ConnectionLostPolicy::Abort`], after forcing
/// the latch off.
pub async fn mqtt_event_task(
    mut eventloop: EventLoop,
    client: AsyncClient,
    state: Arc<AppState>,
    topic: String,
    policy: ConnectionLostPolicy,
    link: BrokerLink,
) -> Result<(), RelayError> {
    info!("Starting MQTT event task");

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => handle_publish(&state, &publish),
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                // Clean sessions drop subscriptions, so renew on every new connection
                info!("Connected to MQTT broker, subscribing to topic {}", topic);
                link.set_connected(true);
                renew_subscription(&client, &topic);
            }
            Ok(Event::Incoming(Packet::SubAck(ack))) => {
                if ack.return_codes.iter().any(|c| matches!(c, SubscribeReasonCode::Failure)) {
                    warn!("Broker rejected subscription to topic {}", topic);
                }
            }
            Ok(_) => {}
            Err(e) => {
                link.set_connected(false);
                match policy {
                    ConnectionLostPolicy::Abort => {
                        error!("Connection lost from MQTT broker: {}, aborting", e);
                        if let Err(e) = state.timer.force_latch_off() {
                            error!("Failed to switch latch off: {}", e);
                        }
                        return Err(RelayError::ConnectionLost(e));
                    }
                    ConnectionLostPolicy::Reconnect => {
                        warn!("Connection lost from MQTT broker: {}, reconnecting", e);
                        sleep(RECONNECT_DELAY).await;
                    }
                }
            }
        }
    }
}

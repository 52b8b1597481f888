//! Status reports over MQTT

use rumqttc::{AsyncClient, QoS};

use super::BrokerLink;
use crate::tasks::StatusSink;

/// Publishes status reports to a fixed topic, QoS 0, not retained
#[derive(Debug, Clone)]
pub struct MqttStatusSink {
    client: AsyncClient,
    topic: String,
    link: BrokerLink,
}

impl MqttStatusSink {
    pub fn new(client: AsyncClient, topic: String, link: BrokerLink) -> Self {
        Self { client, topic, link }
    }
}

impl StatusSink for MqttStatusSink {
    fn publish(&self, payload: String) -> Result<(), String> {
        // Reports queued during an outage would be replayed stale after reconnecting
        if !self.link.is_connected() {
            return Err(format!("Not connected, dropping report for {}", self.topic));
        }

        // Never wait on a full request queue; the next tick carries fresher data
        self.client
            .try_publish(self.topic.as_str(), QoS::AtMostOnce, false, payload)
            .map_err(|e| format!("Failed to publish to {}: {}", self.topic, e))
    }
}

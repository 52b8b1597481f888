//! Broker connection flag shared by the event loop and the status sink

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Whether the broker connection is currently up.
///
/// The event task sets it on every CONNACK and clears it on every
/// connection error; the status sink only enqueues reports while it is set.
#[derive(Debug, Clone, Default)]
pub struct BrokerLink {
    connected: Arc<AtomicBool>,
}

impl BrokerLink {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: Arc::new(AtomicBool::new(connected)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }
}

//! Recording latch and status sink shared by the integration tests.

#![allow(dead_code)]

pub mod broker;

use std::sync::{Arc, Mutex};

use relay_timer::{hardware::Latch, tasks::StatusSink, CountdownTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchCall {
    Activate,
    Deactivate,
}

/// Records every latch call; clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RecordingLatch {
    calls: Arc<Mutex<Vec<LatchCall>>>,
}

impl RecordingLatch {
    pub fn calls(&self) -> Vec<LatchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: LatchCall) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }
}

impl Latch for RecordingLatch {
    fn activate(&mut self) {
        self.calls.lock().unwrap().push(LatchCall::Activate);
    }

    fn deactivate(&mut self) {
        self.calls.lock().unwrap().push(LatchCall::Deactivate);
    }

    fn is_energized(&self) -> bool {
        self.calls.lock().unwrap().last() == Some(&LatchCall::Activate)
    }
}

pub fn recording_timer(max_seconds: u64) -> (Arc<CountdownTimer>, RecordingLatch) {
    let latch = RecordingLatch::default();
    let timer = CountdownTimer::new(max_seconds, Box::new(latch.clone()));
    (Arc::new(timer), latch)
}

/// Collects published payloads, optionally failing every publish.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub payloads: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            payloads: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }
}

impl StatusSink for RecordingSink {
    fn publish(&self, payload: String) -> Result<(), String> {
        self.payloads.lock().unwrap().push(payload);
        if self.fail {
            Err("broker unavailable".to_string())
        } else {
            Ok(())
        }
    }
}

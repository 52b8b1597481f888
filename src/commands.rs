//! Inbound timer commands
//!
//! A command payload is either empty, which adds the configured default
//! duration, or the ASCII decimal form of a signed number of seconds to add
//! (`"600"`, `"+600"`) or subtract (`"-300"`). Surrounding whitespace is
//! ignored. Anything else is discarded without touching the timer.

use tracing::{debug, info};

use crate::state::{Adjustment, AppState};

/// A parsed command payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundCommand {
    /// Empty payload: add the configured default duration
    AddDefault,
    /// Add (positive) or subtract (negative) this many seconds
    Adjust(i64),
}

impl InboundCommand {
    /// Parse a raw payload, returning `None` for malformed input
    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.is_empty() {
            return Some(Self::AddDefault);
        }

        let text = std::str::from_utf8(payload).ok()?;
        text.trim().parse::<i64>().ok().map(Self::Adjust)
    }

    /// Signed delta this command applies
    pub fn delta(self, default_added_seconds: i64) -> i64 {
        match self {
            Self::AddDefault => default_added_seconds,
            Self::Adjust(seconds) => seconds,
        }
    }
}

/// Apply one received payload to the timer.
///
/// `source` names where the payload came from (topic or endpoint) and is
/// only used for logging. Returns `Ok(None)` when the payload was discarded.
pub fn dispatch_command(
    state: &AppState,
    source: &str,
    payload: &[u8],
) -> Result<Option<Adjustment>, String> {
    if payload.is_empty() {
        info!("Received empty message from {}", source);
    } else {
        info!("Received message: {} from {}", String::from_utf8_lossy(payload), source);
    }

    let Some(command) = InboundCommand::parse(payload) else {
        debug!("Ignoring malformed command payload from {}", source);
        return Ok(None);
    };

    let delta = command.delta(state.default_added_seconds);
    let adjustment = state.timer.adjust_by_delta(delta)?;
    state.record_command(format!("{} {:+} seconds", source, delta));

    Ok(Some(adjustment))
}

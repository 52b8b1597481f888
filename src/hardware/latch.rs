//! Latch controller and wiring polarity

use embedded_hal::digital::OutputPin;
use tracing::{debug, error};

/// Wiring polarity of the relay input, fixed at deployment time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// A high line level energizes the relay
    ActiveHigh,
    /// A low line level energizes the relay
    ActiveLow,
}

impl Polarity {
    /// Line level (0 or 1) that produces the requested latch state
    pub fn level(self, energized: bool) -> u8 {
        match (self, energized) {
            (Polarity::ActiveHigh, true) | (Polarity::ActiveLow, false) => 1,
            (Polarity::ActiveHigh, false) | (Polarity::ActiveLow, true) => 0,
        }
    }
}

/// On/off control of the relay latch, as seen by the countdown timer.
///
/// Implementations must not panic: a failed physical write is reported
/// through logging and never reaches the timer.
pub trait Latch: Send {
    /// Energize the relay
    fn activate(&mut self);

    /// De-energize the relay
    fn deactivate(&mut self);

    /// Last state that was requested
    fn is_energized(&self) -> bool;
}

/// Drives any [`OutputPin`] as a latch, applying the configured polarity
#[derive(Debug)]
pub struct LatchController<P> {
    pin: P,
    polarity: Polarity,
    energized: bool,
}

impl<P: OutputPin> LatchController<P> {
    /// Wrap an already configured output pin
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self {
            pin,
            polarity,
            energized: false,
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    fn write(&mut self, energized: bool) {
        let level = self.polarity.level(energized);
        debug!("Setting latch {} (line level {})", if energized { "on" } else { "off" }, level);

        let result = if level == 1 {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };

        if let Err(e) = result {
            error!("Failed to drive latch line to {}: {:?}", level, e);
        }
        self.energized = energized;
    }
}

impl<P: OutputPin + Send> Latch for LatchController<P> {
    fn activate(&mut self) {
        self.write(true);
    }

    fn deactivate(&mut self) {
        self.write(false);
    }

    fn is_energized(&self) -> bool {
        self.energized
    }
}

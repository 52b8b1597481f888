//! Linux GPIO character-device output line

use std::path::PathBuf;

use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin};
use gpio_cdev::{Chip, LineHandle, LineRequestFlags};
use tracing::info;

use crate::error::RelayError;

const CONSUMER: &str = "relay-timer";

/// Write failure on a requested line
#[derive(Debug)]
pub struct LineWriteError(pub gpio_cdev::Error);

impl digital::Error for LineWriteError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A single output line held for the lifetime of the process
pub struct CdevOutputLine {
    handle: LineHandle,
}

impl CdevOutputLine {
    /// Request `line` on `chip` as an output driven to `initial_level`.
    ///
    /// `chip` is either a device path or a bare name under `/dev`.
    pub fn request(chip: &str, line: u32, initial_level: u8) -> Result<Self, RelayError> {
        let gpio_error = |source| RelayError::Gpio {
            chip: chip.to_string(),
            line,
            source,
        };

        let mut device = Chip::new(chip_path(chip)).map_err(gpio_error)?;
        let handle = device
            .get_line(line)
            .and_then(|l| l.request(LineRequestFlags::OUTPUT, initial_level, CONSUMER))
            .map_err(gpio_error)?;

        info!("Requested GPIO line {} on {} (initial level {})", line, chip, initial_level);
        Ok(Self { handle })
    }
}

fn chip_path(chip: &str) -> PathBuf {
    if chip.contains('/') {
        PathBuf::from(chip)
    } else {
        PathBuf::from("/dev").join(chip)
    }
}

impl ErrorType for CdevOutputLine {
    type Error = LineWriteError;
}

impl OutputPin for CdevOutputLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.handle.set_value(0).map_err(LineWriteError)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.handle.set_value(1).map_err(LineWriteError)
    }
}

//! Latch hardware module
//!
//! This module turns the timer's on/off intent into a level on a physical
//! output line.

pub mod gpio;
pub mod latch;

// Re-export main types
pub use gpio::CdevOutputLine;
pub use latch::{Latch, LatchController, Polarity};

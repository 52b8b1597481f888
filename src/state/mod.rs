//! State management module
//!
//! This module contains the shared countdown timer and the application state
//! built around it.

pub mod app_state;
pub mod countdown;

// Re-export main types
pub use app_state::AppState;
pub use countdown::{Adjustment, CountdownTimer, TimerSnapshot, DEFAULT_MAX_SECONDS};

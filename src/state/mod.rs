//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod alert_set;
pub mod app_state;
pub mod glitch;
pub mod timer_session;

// Re-export main types
pub use alert_set::{AlertRule, AlertSet};
pub use app_state::{AppState, TickOutcome};
pub use glitch::{GlitchFrame, GlitchSlot};
pub use timer_session::{DurationConfig, TimerSession, TimerStatus};

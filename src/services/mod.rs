//! External effect boundaries
//!
//! This module contains the sound capability the timer core fires into,
//! plus the default terminal-bell backend.

pub mod sound;
pub mod terminal_bell;

// Re-export main types
pub use sound::{SoundEffects, PIP_SPACING};
pub use terminal_bell::TerminalBell;

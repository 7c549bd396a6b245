//! Error types shared across the state layer and the HTTP API

use thiserror::Error;

use crate::state::TimerStatus;

/// Errors produced by state transitions and configuration writes
#[derive(Debug, Error)]
pub enum StateError {
    /// Configuration writes are only accepted while the timer is idle
    #[error("configuration is locked while the timer is {0:?}")]
    Busy(TimerStatus),

    /// A request carried values the core rejects (e.g. zero beep count)
    #[error("{0}")]
    Invalid(String),

    /// A state mutex was poisoned by a panicking holder
    #[error("Failed to lock state: {0}")]
    Lock(String),
}

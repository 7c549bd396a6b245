//! Countdown session structure and derived display values

use serde::{Deserialize, Serialize};

/// Lifecycle of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Configured countdown duration in wall-clock fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationConfig {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationConfig {
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self { hours, minutes, seconds }
    }

    /// Canonical form of the duration
    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

/// The live countdown state
///
/// Invariants: `remaining_seconds <= total_seconds`, and a session with
/// `remaining_seconds == 0` is never Running or Paused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSession {
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub warning_threshold_seconds: u64,
    pub status: TimerStatus,
}

impl TimerSession {
    /// Create an idle session with the full duration remaining
    pub fn new(total_seconds: u64, warning_threshold_seconds: u64) -> Self {
        Self {
            total_seconds,
            remaining_seconds: total_seconds,
            warning_threshold_seconds,
            status: TimerStatus::Idle,
        }
    }

    /// Check if the countdown is currently ticking
    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Remaining time is inside the warning zone `(0, threshold]`
    pub fn in_warning_zone(&self) -> bool {
        self.remaining_seconds > 0 && self.remaining_seconds <= self.warning_threshold_seconds
    }

    /// Format the remaining time as a zero-padded `HH:MM:SS` string
    pub fn display_time(&self) -> String {
        let hours = self.remaining_seconds / 3600;
        let minutes = (self.remaining_seconds % 3600) / 60;
        let seconds = self.remaining_seconds % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl Default for TimerSession {
    fn default() -> Self {
        Self::new(60, 10)
    }
}

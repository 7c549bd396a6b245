//! Urgency-driven glitch signal for the displayed time
//!
//! While the countdown is running inside the warning zone, a fast sampler
//! rolls against an urgency-weighted probability and briefly replaces the
//! display string with a corrupted rendering. The model here is pure; the
//! sampling cadence lives in the glitch sampler task.

use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

use super::timer_session::TimerSession;

/// Sampling period of the glitch estimator
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// Emission probability at zero urgency
const BASE_PROBABILITY: f64 = 0.1;
/// Additional probability at full urgency
const URGENCY_WEIGHT: f64 = 0.3;
/// Chance that a separator survives corruption
const KEEP_SEPARATOR_PROBABILITY: f64 = 0.7;
/// Glitch hold window bounds, in milliseconds
const MIN_HOLD_MS: u64 = 50;
const MAX_HOLD_MS: u64 = 150;

const SEPARATOR: char = ':';
const SYMBOLS: &[u8] = b"#$%&@*+=<>?!/\\|~^";

/// How deep into the warning zone the countdown is, in `[0, 1]`
pub fn urgency(remaining_seconds: u64, threshold_seconds: u64) -> f64 {
    if threshold_seconds == 0 {
        return 0.0;
    }
    (1.0 - remaining_seconds as f64 / threshold_seconds as f64).clamp(0.0, 1.0)
}

/// Per-sample emission probability for the given session values
pub fn emission_probability(remaining_seconds: u64, threshold_seconds: u64) -> f64 {
    BASE_PROBABILITY + URGENCY_WEIGHT * urgency(remaining_seconds, threshold_seconds)
}

/// Produce a corrupted rendering of a display string
///
/// Separator positions keep their character with 70% probability and are
/// otherwise substituted from the symbol set; every other position is
/// always substituted.
pub fn corrupt<R: Rng>(display: &str, rng: &mut R) -> String {
    display
        .chars()
        .map(|c| {
            if c == SEPARATOR && rng.random::<f64>() < KEEP_SEPARATOR_PROBABILITY {
                c
            } else {
                SYMBOLS[rng.random_range(0..SYMBOLS.len())] as char
            }
        })
        .collect()
}

/// One sampling step of the estimator
///
/// Returns the glitched text and its hold duration when an emission fires,
/// and `None` when the session is outside the warning zone, not running,
/// or the roll misses.
pub fn sample<R: Rng>(session: &TimerSession, rng: &mut R) -> Option<(String, Duration)> {
    if !session.is_running() || !session.in_warning_zone() {
        return None;
    }
    let probability =
        emission_probability(session.remaining_seconds, session.warning_threshold_seconds);
    if rng.random::<f64>() >= probability {
        return None;
    }
    let hold = Duration::from_millis(rng.random_range(MIN_HOLD_MS..MAX_HOLD_MS));
    Some((corrupt(&session.display_time(), rng), hold))
}

/// An active glitch window over the display string
#[derive(Debug, Clone)]
pub struct GlitchFrame {
    pub text: String,
    pub expires_at: Instant,
}

/// Holder for the single visible glitch window
///
/// Each emission bumps the sequence number; a pending clear only wipes the
/// frame it was scheduled for, so a later emission supersedes it.
#[derive(Debug, Default)]
pub struct GlitchSlot {
    seq: u64,
    frame: Option<GlitchFrame>,
}

impl GlitchSlot {
    /// Install a new glitch window, superseding any pending clear
    pub fn emit(&mut self, text: String, hold: Duration) -> u64 {
        self.seq += 1;
        self.frame = Some(GlitchFrame {
            text,
            expires_at: Instant::now() + hold,
        });
        self.seq
    }

    /// Clear the frame only if no newer emission replaced it
    pub fn clear_if(&mut self, seq: u64) {
        if self.seq == seq {
            self.frame = None;
        }
    }

    /// Unconditionally clear the frame
    pub fn clear(&mut self) {
        self.frame = None;
    }

    /// The currently visible glitch text, if its window has not expired
    pub fn current(&self) -> Option<&str> {
        self.frame
            .as_ref()
            .filter(|frame| frame.expires_at > Instant::now())
            .map(|frame| frame.text.as_str())
    }

    /// Number of emissions so far
    pub fn emissions(&self) -> u64 {
        self.seq
    }
}

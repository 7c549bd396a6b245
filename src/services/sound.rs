//! Sound capability consumed by the timer core
//!
//! The core only ever fires these effects and never waits on them; a
//! backend that cannot play (or a recording fake in tests) must not affect
//! countdown behavior.

use std::time::Duration;

/// Spacing between pips in a beep sequence
pub const PIP_SPACING: Duration = Duration::from_millis(150);

/// Fire-and-forget audio effects
///
/// Implementations must return immediately; anything that takes time
/// (sequenced pips, tone decay) happens off the caller's thread.
pub trait SoundEffects: Send + Sync {
    /// Prepare the backend for playback; called on the start action so the
    /// first audible effect has a warm backend
    fn unlock(&self);

    /// Short feedback blip played when the countdown starts
    fn play_tick(&self);

    /// A single high pip
    fn play_pip(&self);

    /// `count` pips at fixed spacing; zero is a no-op
    fn play_sequence(&self, count: u32);

    /// Soft per-second cue inside the warning zone
    fn play_warning(&self);

    /// The finish alarm
    fn play_alarm(&self);
}

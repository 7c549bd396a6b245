//! Delayed and self-clearing audio cues

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{interval_at, sleep, Instant};
use tracing::debug;

use crate::services::SoundEffects;
use crate::state::{TimerSession, TimerStatus};

/// Fixed delay before the warning tone, so it does not land on top of alert
/// pips fired in the same tick
pub const WARNING_TONE_DELAY: Duration = Duration::from_millis(100);

/// Spacing of the finish alarm repeats
pub const ALARM_REPEAT_PERIOD: Duration = Duration::from_millis(1500);

/// Auto-silence after 4.5s: at most this many repeats follow the initial play
pub const ALARM_REPEATS: u32 = 3;

/// Play the warning tone after its fixed offset
pub async fn delayed_warning_cue(sounds: Arc<dyn SoundEffects>) {
    sleep(WARNING_TONE_DELAY).await;
    sounds.play_warning();
}

/// Finish alarm: one immediate play, then repeats every 1.5s until the
/// auto-silence cap, stopping early if the session leaves Finished
pub async fn alarm_sequence(session: Arc<Mutex<TimerSession>>, sounds: Arc<dyn SoundEffects>) {
    sounds.play_alarm();

    let mut interval = interval_at(Instant::now() + ALARM_REPEAT_PERIOD, ALARM_REPEAT_PERIOD);
    for _ in 0..ALARM_REPEATS {
        interval.tick().await;
        let still_finished = session
            .lock()
            .map(|s| s.status == TimerStatus::Finished)
            .unwrap_or(false);
        if !still_finished {
            debug!("Alarm sequence silenced by a status change");
            return;
        }
        sounds.play_alarm();
    }
    debug!("Alarm sequence auto-silenced");
}

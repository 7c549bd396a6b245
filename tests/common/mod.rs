//! Shared test helpers: a recording sound capability and state builders

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use podium::services::SoundEffects;
use podium::state::{AppState, DurationConfig};

/// One recorded sound invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    Unlock,
    Tick,
    Pip,
    Sequence(u32),
    Warning,
    Alarm,
}

/// Sound capability that records every invocation instead of playing it
#[derive(Debug, Default)]
pub struct RecordingSounds {
    events: Mutex<Vec<SoundEvent>>,
}

impl RecordingSounds {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Everything recorded so far, in invocation order
    pub fn events(&self) -> Vec<SoundEvent> {
        self.events.lock().unwrap().clone()
    }

    /// How many times a specific event was recorded
    pub fn count(&self, needle: SoundEvent) -> usize {
        self.events.lock().unwrap().iter().filter(|e| **e == needle).count()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn record(&self, event: SoundEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl SoundEffects for RecordingSounds {
    fn unlock(&self) {
        self.record(SoundEvent::Unlock);
    }

    fn play_tick(&self) {
        self.record(SoundEvent::Tick);
    }

    fn play_pip(&self) {
        self.record(SoundEvent::Pip);
    }

    fn play_sequence(&self, count: u32) {
        self.record(SoundEvent::Sequence(count));
    }

    fn play_warning(&self) {
        self.record(SoundEvent::Warning);
    }

    fn play_alarm(&self) {
        self.record(SoundEvent::Alarm);
    }
}

/// Build an AppState wired to a recording sound capability
pub fn test_state(
    duration: DurationConfig,
    warning_threshold: u64,
) -> (Arc<AppState>, Arc<RecordingSounds>) {
    let sounds = RecordingSounds::new();
    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        duration,
        warning_threshold,
        sounds.clone() as Arc<dyn SoundEffects>,
    ));
    (state, sounds)
}

/// Same as `test_state` but with the stock alert rules removed
pub fn bare_state(
    duration: DurationConfig,
    warning_threshold: u64,
) -> (Arc<AppState>, Arc<RecordingSounds>) {
    let (state, sounds) = test_state(duration, warning_threshold);
    let ids: Vec<u64> = state.list_alerts().unwrap().iter().map(|r| r.id).collect();
    for id in ids {
        state.remove_alert(id).unwrap();
    }
    (state, sounds)
}

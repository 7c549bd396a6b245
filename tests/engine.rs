//! State machine and tick dispatch tests, driven synchronously through the
//! engine methods with a recording sound capability

mod common;

use common::{bare_state, test_state, SoundEvent};
use podium::state::{DurationConfig, TickOutcome, TimerStatus};
use podium::StateError;

fn minutes(m: u64) -> DurationConfig {
    DurationConfig::new(0, m, 0)
}

#[test]
fn zero_duration_start_is_rejected() {
    let (state, sounds) = test_state(DurationConfig::new(0, 0, 0), 10);
    let session = state.start().unwrap();
    assert_eq!(session.status, TimerStatus::Idle);
    assert_eq!(session.remaining_seconds, 0);
    assert!(sounds.events().is_empty(), "a rejected start must stay silent");
}

#[test]
fn start_unlocks_audio_and_plays_tick() {
    let (state, sounds) = test_state(minutes(1), 10);
    let session = state.start().unwrap();
    assert_eq!(session.status, TimerStatus::Running);
    assert_eq!(sounds.events(), vec![SoundEvent::Unlock, SoundEvent::Tick]);
}

#[test]
fn start_while_running_is_a_noop() {
    let (state, sounds) = test_state(minutes(1), 10);
    state.start().unwrap();
    let again = state.start().unwrap();
    assert_eq!(again.status, TimerStatus::Running);
    assert_eq!(again.remaining_seconds, 60);
    assert_eq!(sounds.count(SoundEvent::Tick), 1, "a redundant start must not replay the tick");
}

#[test]
fn ticks_decrement_by_exactly_one() {
    let (state, _sounds) = bare_state(minutes(1), 10);
    state.start().unwrap();
    for expected in (0..60).rev() {
        let outcome = state.tick().unwrap();
        assert_eq!(outcome.session.remaining_seconds, expected);
        assert!(outcome.session.remaining_seconds <= outcome.session.total_seconds);
    }
}

#[test]
fn countdown_terminates_and_stays_finished() {
    let (state, _sounds) = bare_state(DurationConfig::new(0, 0, 5), 0);
    state.start().unwrap();
    let mut last: Option<TickOutcome> = None;
    for _ in 0..5 {
        last = Some(state.tick().unwrap());
    }
    let last = last.unwrap();
    assert!(last.finished);
    assert_eq!(last.session.status, TimerStatus::Finished);
    assert_eq!(last.session.remaining_seconds, 0);

    // further ticks are discarded without touching the session
    for _ in 0..3 {
        let outcome = state.tick().unwrap();
        assert!(!outcome.finished);
        assert_eq!(outcome.session.status, TimerStatus::Finished);
        assert_eq!(outcome.session.remaining_seconds, 0);
    }
}

#[test]
fn zero_remaining_is_never_running_or_paused() {
    let (state, _sounds) = bare_state(DurationConfig::new(0, 0, 2), 0);
    state.start().unwrap();
    for _ in 0..2 {
        let outcome = state.tick().unwrap();
        if outcome.session.remaining_seconds == 0 {
            assert!(matches!(
                outcome.session.status,
                TimerStatus::Idle | TimerStatus::Finished
            ));
        }
    }
    let paused = state.pause().unwrap();
    assert_eq!(paused.status, TimerStatus::Finished, "pause after finish must not stick");
}

#[test]
fn alert_rule_fires_once_without_warning_tone() {
    let (state, sounds) = bare_state(minutes(1), 10);
    state.add_alert(30, 2).unwrap();
    state.start().unwrap();
    sounds.clear();

    for _ in 0..29 {
        let outcome = state.tick().unwrap();
        assert!(outcome.alert.is_none());
    }
    let outcome = state.tick().unwrap();
    assert_eq!(outcome.session.remaining_seconds, 30);
    let fired = outcome.alert.expect("rule at 30s must fire on the 30th tick");
    assert_eq!(fired.beep_count, 2);
    assert!(!outcome.warning_due, "an alert tick must not also play the warning tone");
    assert_eq!(sounds.events(), vec![SoundEvent::Sequence(2)]);
}

#[test]
fn warning_zone_cues_every_second() {
    let (state, _sounds) = bare_state(DurationConfig::new(0, 0, 12), 10);
    state.start().unwrap();

    let mut warned_at = Vec::new();
    for _ in 0..12 {
        let outcome = state.tick().unwrap();
        if outcome.warning_due {
            warned_at.push(outcome.session.remaining_seconds);
        }
    }
    assert_eq!(warned_at, (1..=10).rev().collect::<Vec<u64>>());
}

#[test]
fn finishing_tick_does_not_add_a_warning_tone() {
    let (state, _sounds) = bare_state(DurationConfig::new(0, 0, 1), 10);
    state.start().unwrap();
    let outcome = state.tick().unwrap();
    assert!(outcome.finished);
    assert!(!outcome.warning_due);
}

#[test]
fn alert_beats_warning_in_the_zone() {
    let (state, _sounds) = bare_state(DurationConfig::new(0, 0, 12), 10);
    state.add_alert(10, 4).unwrap();
    state.start().unwrap();

    state.tick().unwrap(); // 11s, outside the zone
    let at_ten = state.tick().unwrap();
    assert!(at_ten.alert.is_some());
    assert!(!at_ten.warning_due);
    let at_nine = state.tick().unwrap();
    assert!(at_nine.alert.is_none());
    assert!(at_nine.warning_due);
}

#[test]
fn duplicate_triggers_fire_first_in_stored_order_only() {
    let (state, sounds) = bare_state(minutes(1), 0);
    state.add_alert(20, 1).unwrap();
    state.add_alert(20, 5).unwrap();
    state.start().unwrap();
    sounds.clear();

    for _ in 0..40 {
        state.tick().unwrap();
    }
    assert_eq!(
        sounds.events(),
        vec![SoundEvent::Sequence(1)],
        "only the first rule in stored order fires for a shared trigger"
    );
}

#[test]
fn pause_freezes_and_resume_continues() {
    let (state, _sounds) = bare_state(minutes(1), 10);
    state.start().unwrap();
    for _ in 0..10 {
        state.tick().unwrap();
    }
    let paused = state.pause().unwrap();
    assert_eq!(paused.status, TimerStatus::Paused);
    assert_eq!(paused.remaining_seconds, 50);

    // ticks while paused are discarded
    let stale = state.tick().unwrap();
    assert_eq!(stale.session.remaining_seconds, 50);

    let resumed = state.start().unwrap();
    assert_eq!(resumed.status, TimerStatus::Running);
    assert_eq!(resumed.remaining_seconds, 50);
}

#[test]
fn pause_while_idle_is_a_noop() {
    let (state, sounds) = test_state(minutes(1), 10);
    let session = state.pause().unwrap();
    assert_eq!(session.status, TimerStatus::Idle);
    assert_eq!(session.remaining_seconds, 60);
    assert!(sounds.events().is_empty());
}

#[test]
fn reset_returns_to_idle_from_every_state() {
    let duration = DurationConfig::new(0, 1, 30);

    // from Running
    let (state, _) = bare_state(duration, 10);
    state.start().unwrap();
    state.tick().unwrap();
    let session = state.reset().unwrap();
    assert_eq!(session.status, TimerStatus::Idle);
    assert_eq!(session.remaining_seconds, 90);
    assert_eq!(session.total_seconds, 90);

    // from Paused
    let (state, _) = bare_state(duration, 10);
    state.start().unwrap();
    state.tick().unwrap();
    state.pause().unwrap();
    let session = state.reset().unwrap();
    assert_eq!(session.status, TimerStatus::Idle);
    assert_eq!(session.remaining_seconds, 90);

    // from Finished
    let (state, _) = bare_state(DurationConfig::new(0, 0, 1), 10);
    state.start().unwrap();
    state.tick().unwrap();
    *state.duration.lock().unwrap() = duration;
    let session = state.reset().unwrap();
    assert_eq!(session.status, TimerStatus::Idle);
    assert_eq!(session.remaining_seconds, 90);
}

#[test]
fn start_from_finished_restarts_fresh() {
    let (state, _sounds) = bare_state(DurationConfig::new(0, 0, 2), 10);
    state.start().unwrap();
    state.tick().unwrap();
    let finished = state.tick().unwrap();
    assert_eq!(finished.session.status, TimerStatus::Finished);

    let session = state.start().unwrap();
    assert_eq!(session.status, TimerStatus::Running);
    assert_eq!(session.remaining_seconds, 2);
}

#[test]
fn muted_countdown_keeps_time_but_stays_silent() {
    let (state, sounds) = bare_state(DurationConfig::new(0, 0, 12), 10);
    state.add_alert(10, 2).unwrap();
    state.start().unwrap();
    state.set_sound_enabled(false).unwrap();
    sounds.clear();

    let mut last = None;
    for _ in 0..12 {
        last = Some(state.tick().unwrap());
    }
    let last = last.unwrap();
    assert!(last.finished);
    assert!(!last.alarm_due, "a muted finish must not start the alarm sequence");
    assert_eq!(last.session.remaining_seconds, 0);
    assert!(sounds.events().is_empty(), "mute must suppress all dispatch");
}

#[test]
fn configuration_is_locked_during_a_run() {
    let (state, _sounds) = test_state(minutes(1), 10);
    state.start().unwrap();

    assert!(matches!(
        state.set_duration(minutes(2)),
        Err(StateError::Busy(TimerStatus::Running))
    ));
    assert!(matches!(
        state.set_warning_threshold(20),
        Err(StateError::Busy(TimerStatus::Running))
    ));
    assert!(matches!(state.add_alert(5, 1), Err(StateError::Busy(_))));
    assert!(matches!(state.remove_alert(1), Err(StateError::Busy(_))));

    state.pause().unwrap();
    assert!(matches!(state.set_duration(minutes(2)), Err(StateError::Busy(_))));

    // mute stays available mid-run
    state.set_sound_enabled(false).unwrap();
    assert!(!state.sound_enabled().unwrap());
}

#[test]
fn idle_duration_change_resyncs_the_session() {
    let (state, _sounds) = test_state(minutes(1), 10);
    let session = state.set_duration(DurationConfig::new(0, 2, 30)).unwrap();
    assert_eq!(session.total_seconds, 150);
    assert_eq!(session.remaining_seconds, 150);
    assert_eq!(session.status, TimerStatus::Idle);
}

#[test]
fn warning_threshold_accepts_any_nonnegative_value() {
    let (state, _sounds) = test_state(minutes(1), 10);
    assert_eq!(state.set_warning_threshold(0).unwrap().warning_threshold_seconds, 0);
    assert_eq!(
        state.set_warning_threshold(86_400).unwrap().warning_threshold_seconds,
        86_400
    );
}

#[test]
fn alert_parameters_must_be_positive() {
    let (state, _sounds) = test_state(minutes(1), 10);
    assert!(matches!(state.add_alert(0, 2), Err(StateError::Invalid(_))));
    assert!(matches!(state.add_alert(30, 0), Err(StateError::Invalid(_))));
}

#[test]
fn removing_an_unknown_alert_is_a_noop() {
    let (state, _sounds) = test_state(minutes(1), 10);
    let before = state.list_alerts().unwrap();
    assert!(!state.remove_alert(9999).unwrap());
    assert_eq!(state.list_alerts().unwrap(), before);
}

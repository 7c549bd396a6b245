//! Main application state and the countdown engine transitions
//!
//! All session mutation funnels through the methods here; the background
//! tasks only decide *when* to call them. Status changes go out on the
//! broadcast channel (the tick loops key their cancellation off it) and
//! every snapshot is republished on the watch channel for observers.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::error::StateError;
use crate::services::SoundEffects;

use super::{
    alert_set::{AlertRule, AlertSet},
    glitch::GlitchSlot,
    timer_session::{DurationConfig, TimerSession, TimerStatus},
};

/// What a single tick decided
///
/// The immediate alert sequence has already been dispatched by the time the
/// caller sees this; the delayed warning tone and the finish alarm are left
/// to the caller so the engine itself never schedules anything.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// Session state after the tick
    pub session: TimerSession,
    /// The alert rule that fired this tick, if any
    pub alert: Option<AlertRule>,
    /// A warning tone should be played after the fixed delay
    pub warning_due: bool,
    /// This tick finished the countdown
    pub finished: bool,
    /// The finish alarm sequence should start (finished and not muted)
    pub alarm_due: bool,
}

/// Main application state holding the countdown session and configuration
pub struct AppState {
    /// The live countdown session
    pub session: Arc<Mutex<TimerSession>>,
    /// Configured alert rules, read-only during a run
    pub alerts: Arc<Mutex<AlertSet>>,
    /// Configured duration used on (re)start
    pub duration: Arc<Mutex<DurationConfig>>,
    /// Mute flag; suppresses dispatch, never the countdown
    pub sound_enabled: Arc<Mutex<bool>>,
    /// The single visible glitch window
    pub glitch: Arc<Mutex<GlitchSlot>>,
    /// Injected sound capability
    pub sounds: Arc<dyn SoundEffects>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for status transition notifications
    pub session_change_tx: broadcast::Sender<TimerSession>,
    /// Channel for per-tick session updates
    pub session_update_tx: watch::Sender<TimerSession>,
    /// Keep the receiver alive to prevent channel closure
    pub _session_update_rx: watch::Receiver<TimerSession>,
}

impl AppState {
    /// Create a new AppState with an idle session and the stock alert rules
    pub fn new(
        port: u16,
        host: String,
        duration: DurationConfig,
        warning_threshold_seconds: u64,
        sounds: Arc<dyn SoundEffects>,
    ) -> Self {
        let (session_change_tx, _) = broadcast::channel(100);
        let session = TimerSession::new(duration.total_seconds(), warning_threshold_seconds);
        let (session_update_tx, session_update_rx) = watch::channel(session.clone());

        Self {
            session: Arc::new(Mutex::new(session)),
            alerts: Arc::new(Mutex::new(AlertSet::with_defaults())),
            duration: Arc::new(Mutex::new(duration)),
            sound_enabled: Arc::new(Mutex::new(true)),
            glitch: Arc::new(Mutex::new(GlitchSlot::default())),
            sounds,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            session_change_tx,
            session_update_tx,
            _session_update_rx: session_update_rx,
        }
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, TimerSession>, StateError> {
        self.session
            .lock()
            .map_err(|e| StateError::Lock(format!("Failed to lock session state: {}", e)))
    }

    fn lock_duration(&self) -> Result<MutexGuard<'_, DurationConfig>, StateError> {
        self.duration
            .lock()
            .map_err(|e| StateError::Lock(format!("Failed to lock duration config: {}", e)))
    }

    fn lock_sound(&self) -> Result<MutexGuard<'_, bool>, StateError> {
        self.sound_enabled
            .lock()
            .map_err(|e| StateError::Lock(format!("Failed to lock sound flag: {}", e)))
    }

    fn lock_alerts(&self) -> Result<MutexGuard<'_, AlertSet>, StateError> {
        self.alerts
            .lock()
            .map_err(|e| StateError::Lock(format!("Failed to lock alert set: {}", e)))
    }

    fn lock_glitch(&self) -> Result<MutexGuard<'_, GlitchSlot>, StateError> {
        self.glitch
            .lock()
            .map_err(|e| StateError::Lock(format!("Failed to lock glitch slot: {}", e)))
    }

    /// Start or resume the countdown
    ///
    /// Starting while Running is a no-op; starting from Finished behaves as
    /// reset-then-start; a zero configured duration rejects the start and
    /// leaves the session Idle.
    pub fn start(&self) -> Result<TimerSession, StateError> {
        let mut session = self.lock_session()?;
        match session.status {
            TimerStatus::Running => {
                debug!("Start ignored, countdown already running");
                return Ok(session.clone());
            }
            TimerStatus::Paused => {
                info!("Resuming countdown at {}s", session.remaining_seconds);
                session.status = TimerStatus::Running;
            }
            TimerStatus::Idle | TimerStatus::Finished => {
                let needs_rewind =
                    session.status == TimerStatus::Finished || session.remaining_seconds == 0;
                if needs_rewind {
                    let was_finished = session.status == TimerStatus::Finished;
                    let total = self.lock_duration()?.total_seconds();
                    session.total_seconds = total;
                    session.remaining_seconds = total;
                    if total == 0 {
                        info!("Start rejected, configured duration is zero");
                        session.status = TimerStatus::Idle;
                        let snapshot = session.clone();
                        drop(session);
                        if was_finished {
                            self.publish_transition(&snapshot);
                        }
                        return Ok(snapshot);
                    }
                }
                info!("Starting countdown: {}s remaining", session.remaining_seconds);
                session.status = TimerStatus::Running;
            }
        }
        let snapshot = session.clone();
        drop(session);
        self.touch_action("start");
        // the start gesture doubles as the audio unlock
        self.sounds.unlock();
        self.sounds.play_tick();
        self.publish_transition(&snapshot);
        Ok(snapshot)
    }

    /// Pause the countdown; a no-op unless Running
    pub fn pause(&self) -> Result<TimerSession, StateError> {
        let mut session = self.lock_session()?;
        if session.status != TimerStatus::Running {
            debug!("Pause ignored while {:?}", session.status);
            return Ok(session.clone());
        }
        session.status = TimerStatus::Paused;
        let snapshot = session.clone();
        drop(session);
        self.touch_action("pause");
        self.publish_transition(&snapshot);
        info!("Countdown paused at {}s", snapshot.remaining_seconds);
        Ok(snapshot)
    }

    /// Reset to Idle with the configured duration, from any status
    pub fn reset(&self) -> Result<TimerSession, StateError> {
        let mut session = self.lock_session()?;
        let total = self.lock_duration()?.total_seconds();
        session.total_seconds = total;
        session.remaining_seconds = total;
        session.status = TimerStatus::Idle;
        let snapshot = session.clone();
        drop(session);
        self.clear_glitch()?;
        self.touch_action("reset");
        self.publish_transition(&snapshot);
        info!("Countdown reset to {}s", total);
        Ok(snapshot)
    }

    /// Advance the countdown by one second
    ///
    /// Dispatches the alert decision for the new remaining value: the first
    /// matching rule's pip sequence, else a (delayed) warning tone inside
    /// the warning zone. A tick that lands on zero clamps, transitions to
    /// Finished and reports the alarm as due. A tick racing a pause or
    /// reset leaves the session untouched.
    pub fn tick(&self) -> Result<TickOutcome, StateError> {
        let mut session = self.lock_session()?;
        if session.status != TimerStatus::Running {
            debug!("Discarding tick while {:?}", session.status);
            return Ok(TickOutcome {
                session: session.clone(),
                alert: None,
                warning_due: false,
                finished: false,
                alarm_due: false,
            });
        }

        let next = session.remaining_seconds.saturating_sub(1);
        let sound_enabled = *self.lock_sound()?;
        // snapshot the alert decision inside this tick's critical section
        let alert = if sound_enabled {
            self.lock_alerts()?.first_match(next).cloned()
        } else {
            None
        };
        let warning_due = sound_enabled
            && alert.is_none()
            && next > 0
            && next <= session.warning_threshold_seconds;
        let finished = next == 0;

        if finished {
            session.remaining_seconds = 0;
            session.status = TimerStatus::Finished;
        } else {
            session.remaining_seconds = next;
        }
        let snapshot = session.clone();
        drop(session);

        if let Some(rule) = &alert {
            debug!(
                "Alert rule {} firing {} pips at {}s remaining",
                rule.id, rule.beep_count, rule.trigger_second
            );
            self.sounds.play_sequence(rule.beep_count);
        }

        if finished {
            self.clear_glitch()?;
            self.publish_transition(&snapshot);
            info!("Countdown finished");
        } else {
            self.publish_progress(&snapshot);
        }

        Ok(TickOutcome {
            session: snapshot,
            alert,
            warning_due,
            finished,
            alarm_due: finished && sound_enabled,
        })
    }

    /// Replace the configured duration; only accepted while Idle
    ///
    /// The idle session is re-synced so the dial shows the new total.
    pub fn set_duration(&self, duration: DurationConfig) -> Result<TimerSession, StateError> {
        let mut session = self.lock_session()?;
        if session.status != TimerStatus::Idle {
            return Err(StateError::Busy(session.status));
        }
        *self.lock_duration()? = duration;
        let total = duration.total_seconds();
        session.total_seconds = total;
        session.remaining_seconds = total;
        let snapshot = session.clone();
        drop(session);
        self.touch_action("duration");
        self.publish_progress(&snapshot);
        info!("Duration set to {}s", total);
        Ok(snapshot)
    }

    /// Replace the warning threshold; only accepted while Idle
    pub fn set_warning_threshold(&self, seconds: u64) -> Result<TimerSession, StateError> {
        let mut session = self.lock_session()?;
        if session.status != TimerStatus::Idle {
            return Err(StateError::Busy(session.status));
        }
        session.warning_threshold_seconds = seconds;
        let snapshot = session.clone();
        drop(session);
        self.touch_action("warning");
        self.publish_progress(&snapshot);
        info!("Warning threshold set to {}s", seconds);
        Ok(snapshot)
    }

    /// Toggle the mute flag; accepted in any status
    pub fn set_sound_enabled(&self, enabled: bool) -> Result<(), StateError> {
        *self.lock_sound()? = enabled;
        self.touch_action(if enabled { "unmute" } else { "mute" });
        info!("Sound {}", if enabled { "enabled" } else { "muted" });
        Ok(())
    }

    /// Current mute flag
    pub fn sound_enabled(&self) -> Result<bool, StateError> {
        Ok(*self.lock_sound()?)
    }

    /// Add an alert rule; only accepted while Idle
    pub fn add_alert(&self, trigger_second: u64, beep_count: u32) -> Result<AlertRule, StateError> {
        {
            let session = self.lock_session()?;
            if session.status != TimerStatus::Idle {
                return Err(StateError::Busy(session.status));
            }
        }
        if trigger_second == 0 {
            return Err(StateError::Invalid(
                "alert trigger second must be positive".to_string(),
            ));
        }
        if beep_count == 0 {
            return Err(StateError::Invalid(
                "alert beep count must be positive".to_string(),
            ));
        }
        let rule = self.lock_alerts()?.add(trigger_second, beep_count);
        self.touch_action("alert-add");
        info!(
            "Alert rule {} added: {} pips at {}s remaining",
            rule.id, rule.beep_count, rule.trigger_second
        );
        Ok(rule)
    }

    /// Remove an alert rule by id; unknown ids are a no-op
    pub fn remove_alert(&self, id: u64) -> Result<bool, StateError> {
        {
            let session = self.lock_session()?;
            if session.status != TimerStatus::Idle {
                return Err(StateError::Busy(session.status));
            }
        }
        let removed = self.lock_alerts()?.remove(id);
        self.touch_action("alert-remove");
        if removed {
            info!("Alert rule {} removed", id);
        } else {
            debug!("Alert rule {} not found, remove ignored", id);
        }
        Ok(removed)
    }

    /// All alert rules in display order (descending trigger second)
    pub fn list_alerts(&self) -> Result<Vec<AlertRule>, StateError> {
        Ok(self.lock_alerts()?.list().to_vec())
    }

    /// Current session snapshot
    pub fn snapshot(&self) -> Result<TimerSession, StateError> {
        Ok(self.lock_session()?.clone())
    }

    /// Install a glitch window; returns its sequence number for the clear
    pub fn emit_glitch(&self, text: String, hold: std::time::Duration) -> Result<u64, StateError> {
        Ok(self.lock_glitch()?.emit(text, hold))
    }

    /// Clear a glitch window unless a newer emission superseded it
    pub fn clear_glitch_if(&self, seq: u64) -> Result<(), StateError> {
        self.lock_glitch()?.clear_if(seq);
        Ok(())
    }

    /// Unconditionally clear any glitch window
    pub fn clear_glitch(&self) -> Result<(), StateError> {
        self.lock_glitch()?.clear();
        Ok(())
    }

    /// The currently visible glitch text, if any window is still open
    pub fn current_glitch(&self) -> Result<Option<String>, StateError> {
        Ok(self.lock_glitch()?.current().map(String::from))
    }

    /// Notify transition listeners and republish the snapshot
    fn publish_transition(&self, session: &TimerSession) {
        if let Err(e) = self.session_change_tx.send(session.clone()) {
            warn!("Failed to send session change notification: {}", e);
        }
        self.publish_progress(session);
    }

    /// Republish the snapshot for watch observers
    fn publish_progress(&self, session: &TimerSession) {
        if let Err(e) = self.session_update_tx.send(session.clone()) {
            warn!("Failed to send session update: {}", e);
        }
    }

    /// Update last action tracking
    fn touch_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

//! Countdown tick background task

use std::{sync::Arc, time::Duration};

use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info, warn};

use crate::state::{AppState, TimerStatus};

use super::cues::{alarm_sequence, delayed_warning_cue};

/// Period of the countdown tick loop
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that drives the countdown while the session is Running
///
/// Waits on the session-change broadcast; a Running snapshot enters the
/// tick loop, and any transition away from Running cancels it. The first
/// decrement lands one full period after the start, never immediately.
pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown task");

    let mut control_rx = state.session_change_tx.subscribe();

    loop {
        match control_rx.recv().await {
            Ok(session) => {
                if session.status != TimerStatus::Running {
                    debug!("Countdown task observed {:?}, staying idle", session.status);
                    continue;
                }
                info!(
                    "Countdown task entering tick loop at {}s remaining",
                    session.remaining_seconds
                );

                let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

                loop {
                    tokio::select! {
                        // Timer tick - advance the countdown
                        _ = interval.tick() => {
                            match state.tick() {
                                Ok(outcome) => {
                                    if outcome.warning_due {
                                        let sounds = Arc::clone(&state.sounds);
                                        tokio::spawn(async move {
                                            delayed_warning_cue(sounds).await;
                                        });
                                    }
                                    if outcome.finished {
                                        if outcome.alarm_due {
                                            let session = Arc::clone(&state.session);
                                            let sounds = Arc::clone(&state.sounds);
                                            tokio::spawn(async move {
                                                alarm_sequence(session, sounds).await;
                                            });
                                        }
                                        break;
                                    }
                                    if outcome.session.status != TimerStatus::Running {
                                        debug!("Tick observed a cancelled session, leaving tick loop");
                                        break;
                                    }
                                }
                                Err(e) => {
                                    error!("Failed to advance countdown: {}", e);
                                    break;
                                }
                            }
                        }

                        // Status change - check if the run was cancelled
                        change = control_rx.recv() => {
                            match change {
                                Ok(new_session) => {
                                    if new_session.status != TimerStatus::Running {
                                        info!(
                                            "Session became {:?}, cancelling tick loop",
                                            new_session.status
                                        );
                                        break;
                                    }
                                }
                                Err(RecvError::Lagged(skipped)) => {
                                    warn!("Countdown task lagged {} session changes", skipped);
                                }
                                Err(RecvError::Closed) => {
                                    info!("Session change channel closed, stopping countdown task");
                                    return;
                                }
                            }
                        }
                    }
                }

                debug!("Tick loop ended, waiting for next session change");
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Countdown task lagged {} session changes while idle", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Session change channel closed, stopping countdown task");
                return;
            }
        }
    }
}

//! Glitch sampler background task

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, sleep};
use tracing::{debug, error, info, warn};

use crate::state::{glitch, AppState, TimerStatus};

/// Background task sampling the urgency model while the session is Running
///
/// Mirrors the countdown task's shape: the broadcast wakes it on a Running
/// transition, an inner loop samples every 200ms, and any transition away
/// from Running cancels the loop and clears the glitch signal.
pub async fn glitch_sampler_task(state: Arc<AppState>) {
    info!("Starting glitch sampler task");

    let mut control_rx = state.session_change_tx.subscribe();
    let mut rng = SmallRng::from_os_rng();

    loop {
        match control_rx.recv().await {
            Ok(session) => {
                if session.status != TimerStatus::Running {
                    continue;
                }
                debug!("Glitch sampler entering sampling loop");

                let mut interval = interval(glitch::SAMPLE_INTERVAL);

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            let session = match state.snapshot() {
                                Ok(s) => s,
                                Err(e) => {
                                    error!("Failed to read session for glitch sample: {}", e);
                                    break;
                                }
                            };
                            if session.status != TimerStatus::Running {
                                break;
                            }
                            if !session.in_warning_zone() {
                                if let Err(e) = state.clear_glitch() {
                                    warn!("Failed to clear glitch signal: {}", e);
                                }
                                continue;
                            }
                            if let Some((text, hold)) = glitch::sample(&session, &mut rng) {
                                match state.emit_glitch(text, hold) {
                                    Ok(seq) => {
                                        // one-shot clear; superseded clears are ignored
                                        let clear_state = Arc::clone(&state);
                                        tokio::spawn(async move {
                                            sleep(hold).await;
                                            if let Err(e) = clear_state.clear_glitch_if(seq) {
                                                warn!("Failed to clear glitch window: {}", e);
                                            }
                                        });
                                    }
                                    Err(e) => error!("Failed to emit glitch: {}", e),
                                }
                            }
                        }

                        change = control_rx.recv() => {
                            match change {
                                Ok(new_session) => {
                                    if new_session.status != TimerStatus::Running {
                                        debug!(
                                            "Session became {:?}, cancelling glitch sampling",
                                            new_session.status
                                        );
                                        break;
                                    }
                                }
                                Err(RecvError::Lagged(skipped)) => {
                                    warn!("Glitch sampler lagged {} session changes", skipped);
                                }
                                Err(RecvError::Closed) => {
                                    info!("Session change channel closed, stopping glitch sampler");
                                    return;
                                }
                            }
                        }
                    }
                }

                // leaving the loop ends this run's glitch window
                if let Err(e) = state.clear_glitch() {
                    warn!("Failed to clear glitch signal on exit: {}", e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Glitch sampler lagged {} session changes while idle", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Session change channel closed, stopping glitch sampler");
                return;
            }
        }
    }
}

//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::StateError;
use crate::state::{AppState, DurationConfig};

use super::responses::{AlertsResponse, ApiResponse, HealthResponse, StatusResponse};

/// Request body for PUT /config/warning
#[derive(Debug, Deserialize)]
pub struct WarningRequest {
    pub seconds: u64,
}

/// Request body for POST /alerts
#[derive(Debug, Deserialize)]
pub struct AlertRequest {
    pub trigger_second: u64,
    pub beep_count: u32,
}

/// Map a state error to the HTTP status it should surface as
fn error_status(err: &StateError) -> StatusCode {
    match err {
        StateError::Busy(_) => StatusCode::CONFLICT,
        StateError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StateError::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok(session) => {
            info!("Start endpoint called, session now {:?}", session.status);
            let message = if session.is_running() {
                "Countdown running".to_string()
            } else {
                "Start rejected, configured duration is zero".to_string()
            };
            if session.is_running() {
                Ok(Json(ApiResponse::ok(message, session)))
            } else {
                Ok(Json(ApiResponse::noop(message, session)))
            }
        }
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(error_status(&e))
        }
    }
}

/// Handle POST /pause - Pause a running countdown
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.pause() {
        Ok(session) => {
            info!("Pause endpoint called, session now {:?}", session.status);
            Ok(Json(ApiResponse::ok(
                format!("Countdown {:?}", session.status).to_lowercase(),
                session,
            )))
        }
        Err(e) => {
            error!("Failed to pause countdown: {}", e);
            Err(error_status(&e))
        }
    }
}

/// Handle POST /reset - Reset the countdown to the configured duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(session) => {
            info!("Reset endpoint called");
            Ok(Json(ApiResponse::ok(
                format!("Countdown reset to {}s", session.total_seconds),
                session,
            )))
        }
        Err(e) => {
            error!("Failed to reset countdown: {}", e);
            Err(error_status(&e))
        }
    }
}

/// Handle POST /mute - Suppress audio dispatch
pub async fn mute_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    set_sound(state, false).await
}

/// Handle POST /unmute - Restore audio dispatch
pub async fn unmute_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    set_sound(state, true).await
}

async fn set_sound(
    state: Arc<AppState>,
    enabled: bool,
) -> Result<Json<ApiResponse>, StatusCode> {
    if let Err(e) = state.set_sound_enabled(enabled) {
        error!("Failed to update sound flag: {}", e);
        return Err(error_status(&e));
    }
    match state.snapshot() {
        Ok(session) => Ok(Json(ApiResponse::ok(
            format!("Sound {}", if enabled { "enabled" } else { "muted" }),
            session,
        ))),
        Err(e) => {
            error!("Failed to read session: {}", e);
            Err(error_status(&e))
        }
    }
}

/// Handle PUT /config/duration - Replace the configured duration (Idle only)
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(duration): Json<DurationConfig>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.set_duration(duration) {
        Ok(session) => Ok(Json(ApiResponse::ok(
            format!("Duration set to {}s", session.total_seconds),
            session,
        ))),
        Err(e) => {
            warn!("Duration change rejected: {}", e);
            Err(error_status(&e))
        }
    }
}

/// Handle PUT /config/warning - Replace the warning threshold (Idle only)
pub async fn warning_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WarningRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.set_warning_threshold(request.seconds) {
        Ok(session) => Ok(Json(ApiResponse::ok(
            format!("Warning threshold set to {}s", session.warning_threshold_seconds),
            session,
        ))),
        Err(e) => {
            warn!("Warning threshold change rejected: {}", e);
            Err(error_status(&e))
        }
    }
}

/// Handle GET /alerts - List alert rules in display order
pub async fn list_alerts_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AlertsResponse>, StatusCode> {
    match state.list_alerts() {
        Ok(alerts) => Ok(Json(AlertsResponse::ok(
            format!("{} alert rules configured", alerts.len()),
            alerts,
        ))),
        Err(e) => {
            error!("Failed to list alerts: {}", e);
            Err(error_status(&e))
        }
    }
}

/// Handle POST /alerts - Add an alert rule (Idle only)
pub async fn add_alert_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AlertRequest>,
) -> Result<Json<AlertsResponse>, StatusCode> {
    match state.add_alert(request.trigger_second, request.beep_count) {
        Ok(rule) => {
            let alerts = state.list_alerts().map_err(|e| error_status(&e))?;
            Ok(Json(AlertsResponse::ok(
                format!(
                    "Alert rule {} added: {} pips at {}s remaining",
                    rule.id, rule.beep_count, rule.trigger_second
                ),
                alerts,
            )))
        }
        Err(e) => {
            warn!("Alert add rejected: {}", e);
            Err(error_status(&e))
        }
    }
}

/// Handle DELETE /alerts/:id - Remove an alert rule (Idle only)
pub async fn remove_alert_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<AlertsResponse>, StatusCode> {
    match state.remove_alert(id) {
        Ok(removed) => {
            let alerts = state.list_alerts().map_err(|e| error_status(&e))?;
            let message = if removed {
                format!("Alert rule {} removed", id)
            } else {
                format!("Alert rule {} not found, nothing removed", id)
            };
            Ok(Json(AlertsResponse::ok(message, alerts)))
        }
        Err(e) => {
            warn!("Alert remove rejected: {}", e);
            Err(error_status(&e))
        }
    }
}

/// Handle GET /status - Return the current session and configuration
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let session = match state.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to read session: {}", e);
            return Err(error_status(&e));
        }
    };
    let glitch = match state.current_glitch() {
        Ok(g) => g,
        Err(e) => {
            error!("Failed to read glitch signal: {}", e);
            return Err(error_status(&e));
        }
    };
    let sound_enabled = match state.sound_enabled() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to read sound flag: {}", e);
            return Err(error_status(&e));
        }
    };
    let alerts = match state.list_alerts() {
        Ok(a) => a,
        Err(e) => {
            error!("Failed to list alerts: {}", e);
            return Err(error_status(&e));
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        display: session.display_time(),
        in_warning_zone: session.in_warning_zone(),
        session,
        glitch,
        sound_enabled,
        alerts,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

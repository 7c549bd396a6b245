//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{AlertRule, TimerSession};

/// API response structure for action and configuration endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: TimerSession,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, session: TimerSession) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            session,
        }
    }

    /// Create an accepted response
    pub fn ok(message: String, session: TimerSession) -> Self {
        Self::new("ok".to_string(), message, session)
    }

    /// Create a no-op response (the request was valid but changed nothing)
    pub fn noop(message: String, session: TimerSession) -> Self {
        Self::new("noop".to_string(), message, session)
    }
}

/// Response for alert-set endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub alerts: Vec<AlertRule>,
}

impl AlertsResponse {
    pub fn new(status: String, message: String, alerts: Vec<AlertRule>) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            alerts,
        }
    }

    pub fn ok(message: String, alerts: Vec<AlertRule>) -> Self {
        Self::new("ok".to_string(), message, alerts)
    }
}

/// Full status response with session, display and configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session: TimerSession,
    /// True remaining time as `HH:MM:SS`
    pub display: String,
    /// Transient corrupted rendering, present only during a glitch window
    pub glitch: Option<String>,
    pub in_warning_zone: bool,
    pub sound_enabled: bool,
    pub alerts: Vec<AlertRule>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

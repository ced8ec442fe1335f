//! API response structures

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    config::Language,
    state::{Mode, RefreshRecord},
};

/// Response for action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    pub fn new(status: &str, message: String) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
        }
    }

    pub fn accepted(message: String) -> Self {
        Self::new("accepted", message)
    }
}

/// Controller status: mode, targets and the last refresh
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub mode: Mode,
    pub sunrise: Option<DateTime<FixedOffset>>,
    pub sunset: Option<DateTime<FixedOffset>>,
    pub dawn: Option<DateTime<FixedOffset>>,
    pub countdown_armed: bool,
    pub last_refresh: Option<RefreshRecord>,
    pub timezone: String,
    pub language: Language,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

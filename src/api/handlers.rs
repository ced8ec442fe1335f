//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, DisplaySnapshot, RefreshScope};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle GET /display - Return every field on the board
pub async fn display_handler(State(state): State<Arc<AppState>>) -> Result<Json<DisplaySnapshot>, StatusCode> {
    state.get_display().map(Json).map_err(|e| {
        error!("Failed to read display: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /status - Return the controller state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let (mode, times, countdown_armed) = match state.with_controller(|c| {
        (c.mode(), c.times().cloned(), c.is_armed())
    }) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to read controller state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Ok(Json(StatusResponse {
        mode,
        sunrise: times.as_ref().map(|t| t.sunrise.fixed_offset()),
        sunset: times.as_ref().map(|t| t.sunset.fixed_offset()),
        dawn: times.as_ref().map(|t| t.dawn().fixed_offset()),
        countdown_armed,
        last_refresh: state.get_last_refresh(),
        timezone: state.timezone.name().to_string(),
        language: state.language,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
    }))
}

/// Handle POST /refresh - Re-fetch zmanim and calendar, like a page reload
pub async fn refresh_handler(State(state): State<Arc<AppState>>) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    match state.request_refresh(RefreshScope::All) {
        Ok(()) => {
            info!("Refresh endpoint called");
            Ok((
                StatusCode::ACCEPTED,
                Json(ApiResponse::accepted("Refresh scheduled".to_string())),
            ))
        }
        Err(e) => {
            error!("{}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

use axum::{extract::State, Json};
use std::sync::Arc;
use crate::models::{HealthResponse, ReadyResponse};
use crate::state::AppState;
use tracing::debug;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}

/// Readiness check endpoint
pub async fn ready_check(State(app_state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    debug!("Readiness check requested");
    // Taking the board lock proves the dispatcher is not wedged
    let sessions = app_state.board.lock().await.stats().sessions as u32;
    Json(ReadyResponse {
        status: "ok".to_string(),
        message: "Service is ready".to_string(),
        sessions,
    })
}

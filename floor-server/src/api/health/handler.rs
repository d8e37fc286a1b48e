//! Health API Handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::core::ServerState;
use crate::floor::StorageStats;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
    pub storage: StorageStats,
}

/// GET /api/health - liveness and storage statistics
pub async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    let storage = state
        .storage
        .get_stats()
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "ok",
        environment: state.config.environment.clone(),
        storage,
    }))
}

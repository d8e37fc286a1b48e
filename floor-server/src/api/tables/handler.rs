//! Dining Table API Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, TableStatistics, TableStatus,
};

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct TableListQuery {
    pub status: Option<TableStatus>,
}

/// GET /api/tables - all tables, ordered by number
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TableListQuery>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = match query.status {
        Some(status) => state.ledger.list_by_status(status)?,
        None => state.ledger.list_tables()?,
    };
    Ok(Json(tables))
}

/// GET /api/tables/{id} - one table
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    Ok(Json(state.ledger.get_table(&id)?))
}

/// GET /api/tables/statistics - occupancy statistics
pub async fn statistics(
    State(state): State<ServerState>,
) -> AppResult<Json<TableStatistics>> {
    Ok(Json(state.ledger.statistics()?))
}

/// POST /api/tables - create a table
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    Ok(Json(state.ledger.create_table(payload)?))
}

/// PUT /api/tables/{id} - update a table (capacity only)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let table = match payload.capacity {
        Some(capacity) => state.ledger.update_capacity(&id, capacity)?,
        None => state.ledger.get_table(&id)?,
    };
    Ok(Json(table))
}

/// DELETE /api/tables/{id} - delete a table (Free only)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.ledger.delete_table(&id)?;
    Ok(Json(true))
}

/// POST /api/tables/{id}/release - free the table for the next seating
pub async fn release(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    state.ledger.release(&id)?;
    Ok(Json(state.ledger.get_table(&id)?))
}

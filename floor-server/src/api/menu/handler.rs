//! Menu Catalog API Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};

use crate::core::ServerState;
use crate::services::MenuCatalog;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct MenuListQuery {
    pub category: Option<String>,
    /// Defaults to true: hide unavailable items from ordering clients
    pub available_only: Option<bool>,
}

/// GET /api/menu - list menu items
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuListQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let category = query.category.as_deref();
    let items = if query.available_only.unwrap_or(true) {
        state.catalog.list_available(category)
    } else {
        state.catalog.list_all(category)
    };
    Ok(Json(items))
}

/// GET /api/menu/{id} - one menu item
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    let item = state
        .catalog
        .get_item(&id)
        .ok_or_else(|| AppError::NotFound(format!("Menu item {}", id)))?;
    Ok(Json(item))
}

/// POST /api/menu - create a menu item
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    Ok(Json(state.catalog.create_item(payload)?))
}

/// PUT /api/menu/{id} - partial update of a menu item
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    Ok(Json(state.catalog.update_item(&id, payload)?))
}

/// DELETE /api/menu/{id} - delete a menu item
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.catalog.delete_item(&id)?;
    Ok(Json(true))
}

//! Order API Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::models::{Order, OrderCreate, OrderStatistics, OrderStatus, OrderStatusUpdate};

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub staff_id: Option<String>,
}

/// POST /api/orders - create an order (reserves the table)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.workflow.create_order(payload)?))
}

/// GET /api/orders - list orders
///
/// `staff_id` filters by waiter (newest first); `status` filters by
/// workflow status (oldest first); with neither, all active orders are
/// returned oldest first.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = if let Some(staff_id) = query.staff_id {
        state.workflow.list_by_staff(&staff_id)?
    } else if let Some(status) = query.status {
        state.workflow.list_by_status(status)?
    } else {
        state.workflow.list_active()?
    };
    Ok(Json(orders))
}

/// GET /api/orders/{id} - one order
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.workflow.get_order(&id)?))
}

/// GET /api/orders/statistics - workflow statistics
pub async fn statistics(
    State(state): State<ServerState>,
) -> AppResult<Json<OrderStatistics>> {
    Ok(Json(state.workflow.statistics()?))
}

/// POST /api/orders/{id}/status - transition an order
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.workflow.transition(&id, payload.status)?))
}

/// POST /api/orders/{id}/cancel - cancel an order (frees the table)
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.workflow.cancel_order(&id)?))
}

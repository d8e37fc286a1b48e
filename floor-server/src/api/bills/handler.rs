//! Bill API Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{Bill, BillCreate, DailySummary, PaymentRequest};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// Inclusive start, epoch milliseconds
    pub from: i64,
    /// Inclusive end, epoch milliseconds
    pub to: i64,
}

#[derive(Debug, Deserialize)]
pub struct DailySummaryQuery {
    /// Defaults to today (UTC)
    pub date: Option<NaiveDate>,
}

/// POST /api/bills - create the bill for a served order
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BillCreate>,
) -> AppResult<Json<Bill>> {
    Ok(Json(state.billing.create_bill(payload)?))
}

/// GET /api/bills/{id} - one bill
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Bill>> {
    Ok(Json(state.billing.get_bill(&id)?))
}

/// GET /api/bills/by-order/{order_id} - the bill for an order
pub async fn by_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Bill>> {
    let bill = state
        .billing
        .get_bill_by_order(&order_id)?
        .ok_or_else(|| AppError::NotFound(format!("No bill for order {}", order_id)))?;
    Ok(Json(bill))
}

/// GET /api/bills/pending - pending bills, oldest first
pub async fn pending(State(state): State<ServerState>) -> AppResult<Json<Vec<Bill>>> {
    Ok(Json(state.billing.get_pending_bills()?))
}

/// GET /api/bills/range?from=&to= - bills in a time range, newest first
pub async fn range(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<Bill>>> {
    if query.from > query.to {
        return Err(AppError::Validation(
            "from must not be after to".to_string(),
        ));
    }
    Ok(Json(state.billing.bills_in_range(query.from, query.to)?))
}

/// GET /api/bills/summary/daily?date= - sales summary for one UTC day
pub async fn daily_summary(
    State(state): State<ServerState>,
    Query(query): Query<DailySummaryQuery>,
) -> AppResult<Json<DailySummary>> {
    let date = query.date.unwrap_or_else(|| chrono::Utc::now().date_naive());
    Ok(Json(state.billing.daily_summary(date)?))
}

/// POST /api/bills/{id}/pay - settle a pending bill (table → Billed)
pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PaymentRequest>,
) -> AppResult<Json<Bill>> {
    Ok(Json(state.billing.process_payment(&id, payload.payment_method)?))
}

/// POST /api/bills/{id}/refund - refund a paid bill
pub async fn refund(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Bill>> {
    Ok(Json(state.billing.refund_bill(&id)?))
}

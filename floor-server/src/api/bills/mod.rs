//! Bill API module

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bills", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/pending", get(handler::pending))
        .route("/range", get(handler::range))
        .route("/summary/daily", get(handler::daily_summary))
        .route("/by-order/{order_id}", get(handler::by_order))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/pay", post(handler::pay))
        .route("/{id}/refund", post(handler::refund))
}

//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness and storage statistics
//! - [`tables`] - dining table administration and release
//! - [`orders`] - order creation and kitchen workflow
//! - [`bills`] - billing, payment and sales projections
//! - [`menu`] - menu catalog administration

pub mod bills;
pub mod health;
pub mod menu;
pub mod orders;
pub mod tables;

use crate::core::{Config, ServerState};
use axum::Router;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full application router
pub fn router(state: ServerState, config: &Config) -> Router {
    Router::new()
        .merge(health::router())
        .merge(tables::router())
        .merge(orders::router())
        .merge(bills::router())
        .merge(menu::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_millis(
            config.request_timeout_ms,
        )))
        .with_state(state)
}

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

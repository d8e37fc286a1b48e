use super::storage::StorageError;
use crate::utils::AppError;
use thiserror::Error;

/// Floor engine errors
///
/// Every failure is a rejected operation, never a crash: validation runs
/// before any mutation, and mutations are transactional, so an error
/// always leaves all state unchanged.
#[derive(Debug, Error)]
pub enum FloorError {
    #[error("Table is not free: {0}")]
    TableUnavailable(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Menu item unavailable: {0}")]
    ItemUnavailable(String),

    #[error("Menu item not found: {0}")]
    ItemNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Bill not found: {0}")]
    BillNotFound(String),

    #[error("Bill already exists: {0}")]
    DuplicateBill(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type FloorResult<T> = Result<T, FloorError>;

impl From<FloorError> for AppError {
    fn from(err: FloorError) -> Self {
        match err {
            FloorError::TableUnavailable(msg) => {
                AppError::Conflict(format!("Table is not free: {}", msg))
            }
            FloorError::InvalidTransition(msg) => AppError::BusinessRule(msg),
            FloorError::ItemUnavailable(msg) => {
                AppError::BusinessRule(format!("Menu item unavailable: {}", msg))
            }
            FloorError::ItemNotFound(id) => AppError::NotFound(format!("Menu item {}", id)),
            FloorError::TableNotFound(id) => AppError::NotFound(format!("Table {}", id)),
            FloorError::OrderNotFound(id) => AppError::NotFound(format!("Order {}", id)),
            FloorError::BillNotFound(id) => AppError::NotFound(format!("Bill {}", id)),
            FloorError::DuplicateBill(msg) => AppError::Conflict(msg),
            FloorError::InvalidOperation(msg) => AppError::Validation(msg),
            FloorError::Storage(e) => {
                tracing::error!(error = %e, "Storage error during floor operation");
                AppError::Database(e.to_string())
            }
        }
    }
}

//! Server-level errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Storage error: {0}")]
    Storage(#[from] crate::floor::StorageError),

    #[error("Engine error: {0}")]
    Floor(#[from] crate::floor::FloorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

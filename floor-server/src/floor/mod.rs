//! Floor coordination engine
//!
//! Keeps the three linked entities of a seating (dining table, order,
//! bill) mutually consistent while waiters, kitchen and cashiers mutate
//! them concurrently.
//!
//! # Components
//!
//! - [`FloorStorage`]: redb-backed persistence; one write transaction per
//!   logical operation
//! - [`TableLedger`]: sole authority over table status; owns the atomic
//!   reservation handshake
//! - [`OrderWorkflow`]: order lifecycle and the kitchen state machine
//! - [`BillingEngine`]: bill creation, payment and refund
//!
//! Table effects from the workflow and billing engines always go through
//! the ledger, inside the same transaction as the order/bill mutation.

pub mod billing;
pub mod error;
pub mod ledger;
pub mod money;
pub mod storage;
pub mod workflow;

pub use billing::BillingEngine;
pub use error::{FloorError, FloorResult};
pub use ledger::TableLedger;
pub use storage::{FloorStorage, StorageError, StorageResult, StorageStats};
pub use workflow::OrderWorkflow;

#[cfg(test)]
mod tests;

//! Shared types for the Comanda floor server
//!
//! Data models exchanged between the floor server and its clients
//! (waiter, kitchen and cashier front ends), plus small utilities.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

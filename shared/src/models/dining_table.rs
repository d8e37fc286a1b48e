//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table seating cycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    /// Available for the next seating
    #[default]
    Free,
    /// Reserved by an active order (pending/cooking/ready)
    Occupied,
    /// The bound order has been served
    Served,
    /// The bound order has been paid
    Billed,
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: String,
    /// Staff-facing table number (unique)
    pub number: u32,
    pub capacity: i32,
    pub status: TableStatus,
    /// Order currently bound to this table (id reference, never owning)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_order_id: Option<String>,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: u32,
    pub capacity: i32,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub capacity: Option<i32>,
}

/// Table occupancy statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatistics {
    pub total_tables: u64,
    pub free_tables: u64,
    pub occupied_tables: u64,
    pub served_tables: u64,
    pub billed_tables: u64,
    /// Share of tables not currently Free, in percent
    pub occupancy_rate: f64,
}

//! Order Model

use serde::{Deserialize, Serialize};

/// Order kitchen workflow status
///
/// Allowed transitions: Pending→Cooking, Pending→Cancelled, Cooking→Ready,
/// Cooking→Cancelled, Ready→Served. Served and Cancelled are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Cooking,
    Ready,
    Served,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states accept no further workflow transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Served | Self::Cancelled)
    }

    /// Active states keep the table occupied
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Cooking | Self::Ready)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Cooking => "COOKING",
            Self::Ready => "READY",
            Self::Served => "SERVED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Order line with the price snapshot taken at order creation
///
/// `unit_price` and `name` are frozen at order time so historical bills
/// stay stable across catalog price changes and renames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
    /// quantity × unit_price
    pub line_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Order line input - for creating orders (prices resolved server-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub menu_item_id: String,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub table_id: String,
    /// Waiter who opened the order
    pub staff_id: String,
    pub status: OrderStatus,
    /// Lines in insertion order
    pub lines: Vec<OrderLine>,
    /// Derived: sum of line totals, recomputed whenever lines change
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_id: String,
    pub staff_id: String,
    pub lines: Vec<OrderLineInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Transition order status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Order workflow statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatistics {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub cooking_orders: u64,
    pub ready_orders: u64,
    pub active_orders: u64,
}

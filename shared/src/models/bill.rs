//! Bill Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bill payment lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

/// Bill entity (exactly one per order)
///
/// Amounts: `tax_amount = subtotal × tax_rate / 100`,
/// `total_amount = subtotal + tax_amount + service_charge − discount_amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub order_id: String,
    pub cashier_id: String,
    /// Copied from the order's total at bill-creation time
    pub subtotal: f64,
    /// Percentage, e.g. 8.5 for 8.5%
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub service_charge: f64,
    pub total_amount: f64,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
}

fn default_payment_method() -> String {
    "cash".to_string()
}

/// Create bill payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillCreate {
    pub order_id: String,
    pub cashier_id: String,
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default)]
    pub discount_amount: f64,
    #[serde(default)]
    pub service_charge: f64,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

/// Process payment payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaymentRequest {
    /// Overrides the method recorded at bill creation when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

/// Daily sales summary (projection over bills, no locking)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: chrono::NaiveDate,
    pub total_bills: u64,
    pub total_revenue: f64,
    pub total_tax: f64,
    pub total_discount: f64,
    pub average_bill_amount: f64,
    /// Bill count per payment method
    pub payment_methods: BTreeMap<String, u64>,
}

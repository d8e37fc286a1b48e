//! BillingEngine - bill creation and payment lifecycle
//!
//! Billing and payment are deliberately separate steps: creating a bill
//! computes and freezes the amounts (table stays Served so the bill can be
//! reviewed or reprinted), processing the payment commits the settlement
//! and moves the table to Billed. Freeing the table afterwards is the
//! explicit release operation on the ledger, never an automatic side
//! effect of payment.

use super::error::{FloorError, FloorResult};
use super::ledger::TableLedger;
use super::money::{self, to_decimal, to_f64};
use super::storage::FloorStorage;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{
    Bill, BillCreate, DailySummary, OrderStatus, PaymentStatus,
};
use shared::util::now_millis;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

const MILLIS_PER_DAY: i64 = 86_400_000;

pub struct BillingEngine {
    storage: FloorStorage,
    ledger: Arc<TableLedger>,
}

impl BillingEngine {
    pub fn new(storage: FloorStorage, ledger: Arc<TableLedger>) -> Self {
        Self { storage, ledger }
    }

    /// Create the bill for a served order
    ///
    /// Preconditions: the order exists, is Served, and has no bill yet.
    /// The subtotal is copied from the order's total at this instant; the
    /// table is not touched (it stays Served until payment).
    pub fn create_bill(&self, payload: BillCreate) -> FloorResult<Bill> {
        money::validate_bill_inputs(
            payload.tax_rate,
            payload.discount_amount,
            payload.service_charge,
        )?;

        let txn = self.storage.begin_write()?;
        let order = self
            .storage
            .get_order_txn(&txn, &payload.order_id)?
            .ok_or_else(|| FloorError::OrderNotFound(payload.order_id.clone()))?;
        if order.status != OrderStatus::Served {
            return Err(FloorError::InvalidOperation(format!(
                "order {} is {}, only served orders can be billed",
                order.id, order.status
            )));
        }
        if let Some(existing) = self.storage.bill_id_for_order_txn(&txn, &order.id)? {
            return Err(FloorError::DuplicateBill(format!(
                "order {} already has bill {}",
                order.id, existing
            )));
        }

        let amounts = money::bill_amounts(
            order.total_amount,
            payload.tax_rate,
            payload.discount_amount,
            payload.service_charge,
        );
        let bill = Bill {
            id: Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            cashier_id: payload.cashier_id,
            subtotal: order.total_amount,
            tax_rate: payload.tax_rate,
            tax_amount: amounts.tax_amount,
            discount_amount: payload.discount_amount,
            service_charge: payload.service_charge,
            total_amount: amounts.total_amount,
            payment_method: payload.payment_method,
            payment_status: PaymentStatus::Pending,
            created_at: now_millis(),
        };
        self.storage.store_bill(&txn, &bill)?;
        self.storage.index_bill_for_order(&txn, &bill.order_id, &bill.id)?;
        self.storage.commit(txn)?;

        tracing::info!(
            bill_id = %bill.id,
            order_id = %bill.order_id,
            total = bill.total_amount,
            "Bill created"
        );
        Ok(bill)
    }

    /// Settle a pending bill and move the table to Billed
    ///
    /// The optional payment method overrides the one recorded at bill
    /// creation (the guest changed their mind at the terminal).
    pub fn process_payment(
        &self,
        bill_id: &str,
        payment_method: Option<String>,
    ) -> FloorResult<Bill> {
        let txn = self.storage.begin_write()?;
        let mut bill = self
            .storage
            .get_bill_txn(&txn, bill_id)?
            .ok_or_else(|| FloorError::BillNotFound(bill_id.to_string()))?;
        if bill.payment_status != PaymentStatus::Pending {
            return Err(FloorError::InvalidTransition(format!(
                "bill {} is {:?}, expected Pending",
                bill_id, bill.payment_status
            )));
        }

        if let Some(method) = payment_method {
            bill.payment_method = method;
        }
        bill.payment_status = PaymentStatus::Paid;

        let order = self
            .storage
            .get_order_txn(&txn, &bill.order_id)?
            .ok_or_else(|| FloorError::OrderNotFound(bill.order_id.clone()))?;
        self.ledger.mark_billed_in(&txn, &order.table_id)?;

        self.storage.store_bill(&txn, &bill)?;
        self.storage.commit(txn)?;

        tracing::info!(
            bill_id = %bill_id,
            method = %bill.payment_method,
            amount = bill.total_amount,
            "Payment processed"
        );
        Ok(bill)
    }

    /// Refund a paid bill
    ///
    /// Table disposition after a refund is an operational decision left to
    /// the staff; the table is not touched here.
    pub fn refund_bill(&self, bill_id: &str) -> FloorResult<Bill> {
        let txn = self.storage.begin_write()?;
        let mut bill = self
            .storage
            .get_bill_txn(&txn, bill_id)?
            .ok_or_else(|| FloorError::BillNotFound(bill_id.to_string()))?;
        if bill.payment_status != PaymentStatus::Paid {
            return Err(FloorError::InvalidTransition(format!(
                "bill {} is {:?}, expected Paid",
                bill_id, bill.payment_status
            )));
        }
        bill.payment_status = PaymentStatus::Refunded;
        self.storage.store_bill(&txn, &bill)?;
        self.storage.commit(txn)?;

        tracing::info!(bill_id = %bill_id, amount = bill.total_amount, "Bill refunded");
        Ok(bill)
    }

    // ========== Read Operations ==========
    // Pure projections over bill records; no locking, no invariants.

    /// Get a bill by ID
    pub fn get_bill(&self, bill_id: &str) -> FloorResult<Bill> {
        self.storage
            .get_bill(bill_id)?
            .ok_or_else(|| FloorError::BillNotFound(bill_id.to_string()))
    }

    /// Get the bill for an order, if one exists
    pub fn get_bill_by_order(&self, order_id: &str) -> FloorResult<Option<Bill>> {
        match self.storage.bill_id_for_order(order_id)? {
            Some(bill_id) => Ok(self.storage.get_bill(&bill_id)?),
            None => Ok(None),
        }
    }

    /// All pending bills, oldest first
    pub fn get_pending_bills(&self) -> FloorResult<Vec<Bill>> {
        let mut bills = self.storage.get_all_bills()?;
        bills.retain(|b| b.payment_status == PaymentStatus::Pending);
        bills.sort_by_key(|b| b.created_at);
        Ok(bills)
    }

    /// Bills created in `[from, to]` (epoch millis, inclusive), newest first
    pub fn bills_in_range(&self, from: i64, to: i64) -> FloorResult<Vec<Bill>> {
        let mut bills = self.storage.get_all_bills()?;
        bills.retain(|b| b.created_at >= from && b.created_at <= to);
        bills.sort_by_key(|b| std::cmp::Reverse(b.created_at));
        Ok(bills)
    }

    /// Sales summary for one UTC day
    pub fn daily_summary(&self, date: NaiveDate) -> FloorResult<DailySummary> {
        let start = date
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp_millis();
        let end = start + MILLIS_PER_DAY;

        let mut bills = self.storage.get_all_bills()?;
        bills.retain(|b| b.created_at >= start && b.created_at < end);

        let total_bills = bills.len() as u64;
        let total_revenue: Decimal = bills.iter().map(|b| to_decimal(b.total_amount)).sum();
        let total_tax: Decimal = bills.iter().map(|b| to_decimal(b.tax_amount)).sum();
        let total_discount: Decimal = bills.iter().map(|b| to_decimal(b.discount_amount)).sum();
        let average = if total_bills > 0 {
            total_revenue / Decimal::from(total_bills)
        } else {
            Decimal::ZERO
        };

        let mut payment_methods: BTreeMap<String, u64> = BTreeMap::new();
        for bill in &bills {
            *payment_methods.entry(bill.payment_method.clone()).or_insert(0) += 1;
        }

        Ok(DailySummary {
            date,
            total_bills,
            total_revenue: to_f64(total_revenue),
            total_tax: to_f64(total_tax),
            total_discount: to_f64(total_discount),
            average_bill_amount: to_f64(average),
            payment_methods,
        })
    }
}

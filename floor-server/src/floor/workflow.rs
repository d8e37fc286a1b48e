//! OrderWorkflow - order lifecycle and line-item bookkeeping
//!
//! Orders move through a fixed state machine:
//!
//! ```text
//! Pending ──▶ Cooking ──▶ Ready ──▶ Served
//!    │           │
//!    └───────────┴──▶ Cancelled
//! ```
//!
//! Table effects (reservation on create, Served/Free on transition) are
//! routed through the TableLedger inside the same write transaction, so
//! order and table state always move together or not at all. This
//! component never writes a table record itself.

use super::error::{FloorError, FloorResult};
use super::ledger::TableLedger;
use super::money;
use super::storage::FloorStorage;
use crate::services::MenuCatalog;
use shared::models::{Order, OrderCreate, OrderLine, OrderStatistics, OrderStatus};
use shared::util::now_millis;
use std::sync::Arc;
use uuid::Uuid;

/// The fixed transition table; everything else is rejected
pub(crate) fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
        (from, to),
        (Pending, Cooking)
            | (Pending, Cancelled)
            | (Cooking, Ready)
            | (Cooking, Cancelled)
            | (Ready, Served)
    )
}

pub struct OrderWorkflow {
    storage: FloorStorage,
    ledger: Arc<TableLedger>,
    catalog: Arc<dyn MenuCatalog>,
}

impl OrderWorkflow {
    pub fn new(
        storage: FloorStorage,
        ledger: Arc<TableLedger>,
        catalog: Arc<dyn MenuCatalog>,
    ) -> Self {
        Self {
            storage,
            ledger,
            catalog,
        }
    }

    /// Create an order against a Free table
    ///
    /// Resolves every requested line through the catalog, snapshotting the
    /// current unit price; unknown or unavailable items reject the whole
    /// order. The order is persisted only if the table reservation
    /// succeeds, all-or-nothing.
    pub fn create_order(&self, payload: OrderCreate) -> FloorResult<Order> {
        if payload.lines.is_empty() {
            return Err(FloorError::InvalidOperation(
                "order must contain at least one line".to_string(),
            ));
        }
        for input in &payload.lines {
            money::validate_order_line(input)?;
        }

        // Point-in-time price snapshot; the catalog is never consulted again
        // for this order.
        let mut lines = Vec::with_capacity(payload.lines.len());
        for input in &payload.lines {
            let item = self
                .catalog
                .get_item(&input.menu_item_id)
                .ok_or_else(|| FloorError::ItemNotFound(input.menu_item_id.clone()))?;
            if !item.is_available {
                return Err(FloorError::ItemUnavailable(item.name));
            }
            money::validate_unit_price(item.price, &item.name)?;
            lines.push(OrderLine {
                menu_item_id: item.id,
                name: item.name,
                quantity: input.quantity,
                unit_price: item.price,
                line_total: money::line_total(item.price, input.quantity),
                special_instructions: input.special_instructions.clone(),
            });
        }

        let now = now_millis();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            table_id: payload.table_id.clone(),
            staff_id: payload.staff_id,
            status: OrderStatus::Pending,
            total_amount: money::order_total(&lines),
            lines,
            notes: payload.notes,
            created_at: now,
            updated_at: now,
        };

        let txn = self.storage.begin_write()?;
        if self.storage.get_table_txn(&txn, &payload.table_id)?.is_none() {
            return Err(FloorError::TableNotFound(payload.table_id));
        }
        if !self.ledger.try_reserve_in(&txn, &payload.table_id, &order.id)? {
            return Err(FloorError::TableUnavailable(payload.table_id));
        }
        self.storage.store_order(&txn, &order)?;
        self.storage.commit(txn)?;

        tracing::info!(
            order_id = %order.id,
            table_id = %order.table_id,
            lines = order.lines.len(),
            total = order.total_amount,
            "Order created"
        );
        Ok(order)
    }

    /// Transition an order to a new status
    ///
    /// Served also marks the table Served; Cancelled releases the table.
    /// A rejected transition leaves both order and table untouched.
    pub fn transition(&self, order_id: &str, new_status: OrderStatus) -> FloorResult<Order> {
        let txn = self.storage.begin_write()?;
        let mut order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| FloorError::OrderNotFound(order_id.to_string()))?;

        if !is_valid_transition(order.status, new_status) {
            return Err(FloorError::InvalidTransition(format!(
                "order {}: {} -> {}",
                order_id, order.status, new_status
            )));
        }

        order.status = new_status;
        order.updated_at = now_millis();
        match new_status {
            OrderStatus::Served => self.ledger.mark_served_in(&txn, &order.table_id)?,
            OrderStatus::Cancelled => self.ledger.release_in(&txn, &order.table_id)?,
            _ => {}
        }
        self.storage.store_order(&txn, &order)?;
        self.storage.commit(txn)?;

        tracing::info!(order_id = %order_id, status = %new_status, "Order transitioned");
        Ok(order)
    }

    /// Cancel an order (shorthand for transitioning to Cancelled)
    pub fn cancel_order(&self, order_id: &str) -> FloorResult<Order> {
        self.transition(order_id, OrderStatus::Cancelled)
    }

    // ========== Read Operations ==========

    /// Get an order by ID
    pub fn get_order(&self, order_id: &str) -> FloorResult<Order> {
        self.storage
            .get_order(order_id)?
            .ok_or_else(|| FloorError::OrderNotFound(order_id.to_string()))
    }

    /// Orders in a given status, oldest first
    ///
    /// The ordering is load-bearing: the kitchen queue works oldest-first.
    pub fn list_by_status(&self, status: OrderStatus) -> FloorResult<Vec<Order>> {
        let mut orders = self.storage.get_all_orders()?;
        orders.retain(|o| o.status == status);
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    /// Orders in an active status (Pending/Cooking/Ready), oldest first
    pub fn list_active(&self) -> FloorResult<Vec<Order>> {
        let mut orders = self.storage.get_all_orders()?;
        orders.retain(|o| o.status.is_active());
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    /// Orders created by a staff member, newest first
    pub fn list_by_staff(&self, staff_id: &str) -> FloorResult<Vec<Order>> {
        let mut orders = self.storage.get_all_orders()?;
        orders.retain(|o| o.staff_id == staff_id);
        orders.sort_by_key(|o| std::cmp::Reverse(o.created_at));
        Ok(orders)
    }

    /// Order counts per active status
    pub fn statistics(&self) -> FloorResult<OrderStatistics> {
        let orders = self.storage.get_all_orders()?;
        let count = |s: OrderStatus| orders.iter().filter(|o| o.status == s).count() as u64;

        let pending = count(OrderStatus::Pending);
        let cooking = count(OrderStatus::Cooking);
        let ready = count(OrderStatus::Ready);

        Ok(OrderStatistics {
            total_orders: orders.len() as u64,
            pending_orders: pending,
            cooking_orders: cooking,
            ready_orders: ready,
            active_orders: pending + cooking + ready,
        })
    }
}

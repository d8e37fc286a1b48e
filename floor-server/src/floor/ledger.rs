//! TableLedger - sole authority over dining table status
//!
//! Every table status change in the system goes through this component,
//! which keeps the table/order consistency rules enforceable in one place:
//!
//! - Occupied tables always reference an active order
//! - A table is reserved at most once while non-Free (no double-booking)
//!
//! The reservation primitive is a compare-and-set inside a write
//! transaction: the table must still be Free at write time or nothing is
//! mutated. `pub(crate)` `*_in` variants run inside a caller-owned
//! transaction so OrderWorkflow and BillingEngine can compose table
//! effects into their own atomic units of work.

use super::error::{FloorError, FloorResult};
use super::storage::{FloorStorage, StorageResult};
use redb::WriteTransaction;
use shared::models::{
    DiningTable, DiningTableCreate, TableStatistics, TableStatus,
};
use uuid::Uuid;

/// Capacity bounds for a dining table
const MIN_CAPACITY: i32 = 1;
const MAX_CAPACITY: i32 = 20;

pub struct TableLedger {
    storage: FloorStorage,
}

impl TableLedger {
    pub fn new(storage: FloorStorage) -> Self {
        Self { storage }
    }

    // ========== Administrative Operations ==========

    /// Create a new table (starts Free)
    ///
    /// The staff-facing number must be unique across all tables.
    pub fn create_table(&self, payload: DiningTableCreate) -> FloorResult<DiningTable> {
        validate_capacity(payload.capacity)?;

        let txn = self.storage.begin_write()?;
        if self
            .storage
            .get_all_tables_txn(&txn)?
            .iter()
            .any(|t| t.number == payload.number)
        {
            return Err(FloorError::InvalidOperation(format!(
                "table number {} already exists",
                payload.number
            )));
        }

        let table = DiningTable {
            id: Uuid::new_v4().to_string(),
            number: payload.number,
            capacity: payload.capacity,
            status: TableStatus::Free,
            current_order_id: None,
        };
        self.storage.store_table(&txn, &table)?;
        self.storage.commit(txn)?;

        tracing::info!(table_id = %table.id, number = table.number, "Table created");
        Ok(table)
    }

    /// Update table capacity
    pub fn update_capacity(&self, table_id: &str, capacity: i32) -> FloorResult<DiningTable> {
        validate_capacity(capacity)?;

        let txn = self.storage.begin_write()?;
        let mut table = self
            .storage
            .get_table_txn(&txn, table_id)?
            .ok_or_else(|| FloorError::TableNotFound(table_id.to_string()))?;
        table.capacity = capacity;
        self.storage.store_table(&txn, &table)?;
        self.storage.commit(txn)?;
        Ok(table)
    }

    /// Delete a table; permitted only while Free
    pub fn delete_table(&self, table_id: &str) -> FloorResult<()> {
        let txn = self.storage.begin_write()?;
        let table = self
            .storage
            .get_table_txn(&txn, table_id)?
            .ok_or_else(|| FloorError::TableNotFound(table_id.to_string()))?;
        if table.status != TableStatus::Free {
            return Err(FloorError::InvalidOperation(format!(
                "table {} is {:?}, only Free tables can be deleted",
                table.number, table.status
            )));
        }
        self.storage.remove_table(&txn, table_id)?;
        self.storage.commit(txn)?;

        tracing::info!(table_id = %table_id, "Table deleted");
        Ok(())
    }

    // ========== Read Operations ==========

    /// Get a table by ID
    pub fn get_table(&self, table_id: &str) -> FloorResult<DiningTable> {
        self.storage
            .get_table(table_id)?
            .ok_or_else(|| FloorError::TableNotFound(table_id.to_string()))
    }

    /// All tables, ordered by staff-facing number
    pub fn list_tables(&self) -> FloorResult<Vec<DiningTable>> {
        let mut tables = self.storage.get_all_tables()?;
        tables.sort_by_key(|t| t.number);
        Ok(tables)
    }

    /// Tables in a given status, ordered by number
    pub fn list_by_status(&self, status: TableStatus) -> FloorResult<Vec<DiningTable>> {
        let mut tables = self.storage.get_all_tables()?;
        tables.retain(|t| t.status == status);
        tables.sort_by_key(|t| t.number);
        Ok(tables)
    }

    /// Occupancy statistics across all tables
    pub fn statistics(&self) -> FloorResult<TableStatistics> {
        let tables = self.storage.get_all_tables()?;
        let total = tables.len() as u64;
        let count = |s: TableStatus| tables.iter().filter(|t| t.status == s).count() as u64;

        let free = count(TableStatus::Free);
        let occupied = count(TableStatus::Occupied);
        let served = count(TableStatus::Served);
        let billed = count(TableStatus::Billed);
        let occupancy_rate = if total > 0 {
            (occupied + served + billed) as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Ok(TableStatistics {
            total_tables: total,
            free_tables: free,
            occupied_tables: occupied,
            served_tables: served,
            billed_tables: billed,
            occupancy_rate,
        })
    }

    // ========== Reservation Handshake ==========

    /// Atomically reserve a Free table for an order
    ///
    /// Returns `false` (and mutates nothing) when the table is not
    /// currently Free or does not exist. This compare-and-set is the
    /// race-prevention primitive: two concurrent reservations of the same
    /// table are serialized by the write transaction, and the loser sees a
    /// non-Free table.
    pub fn try_reserve(&self, table_id: &str, order_id: &str) -> FloorResult<bool> {
        let txn = self.storage.begin_write()?;
        let reserved = self.try_reserve_in(&txn, table_id, order_id)?;
        if reserved {
            self.storage.commit(txn)?;
        }
        Ok(reserved)
    }

    /// Compare-and-set reservation within a caller-owned transaction
    pub(crate) fn try_reserve_in(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
        order_id: &str,
    ) -> StorageResult<bool> {
        let Some(mut table) = self.storage.get_table_txn(txn, table_id)? else {
            return Ok(false);
        };
        if table.status != TableStatus::Free {
            return Ok(false);
        }
        table.status = TableStatus::Occupied;
        table.current_order_id = Some(order_id.to_string());
        self.storage.store_table(txn, &table)?;
        tracing::debug!(table_id = %table_id, order_id = %order_id, "Table reserved");
        Ok(true)
    }

    /// Transition Occupied → Served
    pub fn mark_served(&self, table_id: &str) -> FloorResult<()> {
        let txn = self.storage.begin_write()?;
        self.mark_served_in(&txn, table_id)?;
        self.storage.commit(txn)?;
        Ok(())
    }

    pub(crate) fn mark_served_in(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
    ) -> FloorResult<()> {
        let mut table = self
            .storage
            .get_table_txn(txn, table_id)?
            .ok_or_else(|| FloorError::TableNotFound(table_id.to_string()))?;
        if table.status != TableStatus::Occupied {
            return Err(FloorError::InvalidTransition(format!(
                "table {} is {:?}, expected Occupied",
                table.number, table.status
            )));
        }
        table.status = TableStatus::Served;
        self.storage.store_table(txn, &table)?;
        Ok(())
    }

    /// Transition Served → Billed
    pub fn mark_billed(&self, table_id: &str) -> FloorResult<()> {
        let txn = self.storage.begin_write()?;
        self.mark_billed_in(&txn, table_id)?;
        self.storage.commit(txn)?;
        Ok(())
    }

    pub(crate) fn mark_billed_in(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
    ) -> FloorResult<()> {
        let mut table = self
            .storage
            .get_table_txn(txn, table_id)?
            .ok_or_else(|| FloorError::TableNotFound(table_id.to_string()))?;
        if table.status != TableStatus::Served {
            return Err(FloorError::InvalidTransition(format!(
                "table {} is {:?}, expected Served",
                table.number, table.status
            )));
        }
        table.status = TableStatus::Billed;
        self.storage.store_table(txn, &table)?;
        Ok(())
    }

    /// Free a table for the next seating, clearing the order binding
    ///
    /// Valid from any status and idempotent on an already-Free table.
    /// Used both when an order is cancelled and as the explicit
    /// free-for-next-seating step after billing.
    pub fn release(&self, table_id: &str) -> FloorResult<()> {
        let txn = self.storage.begin_write()?;
        self.release_in(&txn, table_id)?;
        self.storage.commit(txn)?;
        Ok(())
    }

    pub(crate) fn release_in(&self, txn: &WriteTransaction, table_id: &str) -> FloorResult<()> {
        let mut table = self
            .storage
            .get_table_txn(txn, table_id)?
            .ok_or_else(|| FloorError::TableNotFound(table_id.to_string()))?;
        table.status = TableStatus::Free;
        table.current_order_id = None;
        self.storage.store_table(txn, &table)?;
        tracing::debug!(table_id = %table_id, "Table released");
        Ok(())
    }
}

fn validate_capacity(capacity: i32) -> FloorResult<()> {
    if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
        return Err(FloorError::InvalidOperation(format!(
            "capacity must be between {} and {}, got {}",
            MIN_CAPACITY, MAX_CAPACITY, capacity
        )));
    }
    Ok(())
}

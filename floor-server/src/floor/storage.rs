//! redb-based storage layer for the floor engine
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `tables` | `table_id` | `DiningTable` | Dining table records |
//! | `orders` | `order_id` | `Order` | Order records (never deleted) |
//! | `bills` | `bill_id` | `Bill` | Bill records (never deleted) |
//! | `bill_by_order` | `order_id` | `bill_id` | One-bill-per-order index |
//! | `menu_items` | `item_id` | `MenuItem` | Catalog backing store |
//!
//! # Atomicity
//!
//! Every cross-entity mutation (reservation, status transition, billing,
//! payment) runs inside a single write transaction. redb serializes write
//! transactions, so operations touching the same table record are strictly
//! ordered; dropping a transaction without commit discards all of its
//! writes, which is how validation failures leave no partial state behind.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::models::{Bill, DiningTable, MenuItem, Order};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for dining tables: key = table_id, value = JSON-serialized DiningTable
const TABLES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tables");

/// Table for orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for bills: key = bill_id, value = JSON-serialized Bill
const BILLS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("bills");

/// Index enforcing one bill per order: key = order_id, value = bill_id
const BILL_BY_ORDER_TABLE: TableDefinition<&str, &str> = TableDefinition::new("bill_by_order");

/// Table for menu items: key = item_id, value = JSON-serialized MenuItem
const MENU_ITEMS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("menu_items");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Floor storage backed by redb
///
/// redb commits are durable as soon as `commit()` returns (copy-on-write
/// with atomic pointer swap), so a power loss mid-operation leaves the
/// database at the last committed state.
#[derive(Clone)]
pub struct FloorStorage {
    db: Arc<Database>,
}

impl FloorStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Create all tables so later read transactions never miss one
    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(TABLES_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(BILLS_TABLE)?;
            let _ = write_txn.open_table(BILL_BY_ORDER_TABLE)?;
            let _ = write_txn.open_table(MENU_ITEMS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Commit a write transaction
    pub fn commit(&self, txn: WriteTransaction) -> StorageResult<()> {
        txn.commit()?;
        Ok(())
    }

    // ========== Dining Tables ==========

    /// Store a dining table (within transaction)
    pub fn store_table(&self, txn: &WriteTransaction, table: &DiningTable) -> StorageResult<()> {
        let mut t = txn.open_table(TABLES_TABLE)?;
        let value = serde_json::to_vec(table)?;
        t.insert(table.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get a dining table by ID (read-only)
    pub fn get_table(&self, table_id: &str) -> StorageResult<Option<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(TABLES_TABLE)?;
        match t.get(table_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a dining table by ID (within transaction)
    pub fn get_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
    ) -> StorageResult<Option<DiningTable>> {
        let t = txn.open_table(TABLES_TABLE)?;
        match t.get(table_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Remove a dining table (within transaction)
    pub fn remove_table(&self, txn: &WriteTransaction, table_id: &str) -> StorageResult<()> {
        let mut t = txn.open_table(TABLES_TABLE)?;
        t.remove(table_id)?;
        Ok(())
    }

    /// Get all dining tables (read-only)
    pub fn get_all_tables(&self) -> StorageResult<Vec<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(TABLES_TABLE)?;
        let mut tables = Vec::new();
        for result in t.iter()? {
            let (_key, value) = result?;
            tables.push(serde_json::from_slice(value.value())?);
        }
        Ok(tables)
    }

    /// Get all dining tables (within transaction)
    pub fn get_all_tables_txn(&self, txn: &WriteTransaction) -> StorageResult<Vec<DiningTable>> {
        let t = txn.open_table(TABLES_TABLE)?;
        let mut tables = Vec::new();
        for result in t.iter()? {
            let (_key, value) = result?;
            tables.push(serde_json::from_slice(value.value())?);
        }
        Ok(tables)
    }

    // ========== Orders ==========

    /// Store an order (within transaction)
    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut t = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        t.insert(order.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get an order by ID (read-only)
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(ORDERS_TABLE)?;
        match t.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order by ID (within transaction)
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let t = txn.open_table(ORDERS_TABLE)?;
        match t.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get all orders (read-only)
    pub fn get_all_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for result in t.iter()? {
            let (_key, value) = result?;
            orders.push(serde_json::from_slice(value.value())?);
        }
        Ok(orders)
    }

    // ========== Bills ==========

    /// Store a bill (within transaction)
    pub fn store_bill(&self, txn: &WriteTransaction, bill: &Bill) -> StorageResult<()> {
        let mut t = txn.open_table(BILLS_TABLE)?;
        let value = serde_json::to_vec(bill)?;
        t.insert(bill.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get a bill by ID (read-only)
    pub fn get_bill(&self, bill_id: &str) -> StorageResult<Option<Bill>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(BILLS_TABLE)?;
        match t.get(bill_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a bill by ID (within transaction)
    pub fn get_bill_txn(
        &self,
        txn: &WriteTransaction,
        bill_id: &str,
    ) -> StorageResult<Option<Bill>> {
        let t = txn.open_table(BILLS_TABLE)?;
        match t.get(bill_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get all bills (read-only)
    pub fn get_all_bills(&self) -> StorageResult<Vec<Bill>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(BILLS_TABLE)?;
        let mut bills = Vec::new();
        for result in t.iter()? {
            let (_key, value) = result?;
            bills.push(serde_json::from_slice(value.value())?);
        }
        Ok(bills)
    }

    /// Look up the bill for an order (read-only)
    pub fn bill_id_for_order(&self, order_id: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(BILL_BY_ORDER_TABLE)?;
        Ok(t.get(order_id)?.map(|v| v.value().to_string()))
    }

    /// Look up the bill for an order (within transaction)
    pub fn bill_id_for_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<String>> {
        let t = txn.open_table(BILL_BY_ORDER_TABLE)?;
        Ok(t.get(order_id)?.map(|v| v.value().to_string()))
    }

    /// Record the order → bill binding (within transaction)
    pub fn index_bill_for_order(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
        bill_id: &str,
    ) -> StorageResult<()> {
        let mut t = txn.open_table(BILL_BY_ORDER_TABLE)?;
        t.insert(order_id, bill_id)?;
        Ok(())
    }

    // ========== Menu Items ==========
    // Catalog mutations are single-record and open their own transaction.

    /// Store a menu item
    pub fn store_menu_item(&self, item: &MenuItem) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut t = txn.open_table(MENU_ITEMS_TABLE)?;
            let value = serde_json::to_vec(item)?;
            t.insert(item.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get a menu item by ID
    pub fn get_menu_item(&self, item_id: &str) -> StorageResult<Option<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(MENU_ITEMS_TABLE)?;
        match t.get(item_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Remove a menu item; returns whether it existed
    pub fn remove_menu_item(&self, item_id: &str) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut t = txn.open_table(MENU_ITEMS_TABLE)?;
            t.remove(item_id)?.is_some()
        };
        txn.commit()?;
        Ok(existed)
    }

    /// Get all menu items
    pub fn get_all_menu_items(&self) -> StorageResult<Vec<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(MENU_ITEMS_TABLE)?;
        let mut items = Vec::new();
        for result in t.iter()? {
            let (_key, value) = result?;
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok(items)
    }

    // ========== Statistics ==========

    /// Get storage statistics
    pub fn get_stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;
        let tables = read_txn.open_table(TABLES_TABLE)?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;
        let bills = read_txn.open_table(BILLS_TABLE)?;
        let menu_items = read_txn.open_table(MENU_ITEMS_TABLE)?;

        Ok(StorageStats {
            table_count: tables.len()?,
            order_count: orders.len()?,
            bill_count: bills.len()?,
            menu_item_count: menu_items.len()?,
        })
    }
}

/// Storage statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageStats {
    pub table_count: u64,
    pub order_count: u64,
    pub bill_count: u64,
    pub menu_item_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderStatus, PaymentStatus, TableStatus};
    use shared::util::now_millis;

    fn test_table(id: &str, number: u32) -> DiningTable {
        DiningTable {
            id: id.to_string(),
            number,
            capacity: 4,
            status: TableStatus::Free,
            current_order_id: None,
        }
    }

    fn test_order(id: &str, table_id: &str) -> Order {
        Order {
            id: id.to_string(),
            table_id: table_id.to_string(),
            staff_id: "staff-1".to_string(),
            status: OrderStatus::Pending,
            lines: vec![],
            total_amount: 0.0,
            notes: None,
            created_at: now_millis(),
            updated_at: now_millis(),
        }
    }

    fn test_bill(id: &str, order_id: &str) -> Bill {
        Bill {
            id: id.to_string(),
            order_id: order_id.to_string(),
            cashier_id: "cashier-1".to_string(),
            subtotal: 10.0,
            tax_rate: 0.0,
            tax_amount: 0.0,
            discount_amount: 0.0,
            service_charge: 0.0,
            total_amount: 10.0,
            payment_method: "cash".to_string(),
            payment_status: PaymentStatus::Pending,
            created_at: now_millis(),
        }
    }

    #[test]
    fn test_table_roundtrip() {
        let storage = FloorStorage::open_in_memory().unwrap();

        let table = test_table("t1", 1);
        let txn = storage.begin_write().unwrap();
        storage.store_table(&txn, &table).unwrap();
        txn.commit().unwrap();

        let loaded = storage.get_table("t1").unwrap().unwrap();
        assert_eq!(loaded.number, 1);
        assert_eq!(loaded.status, TableStatus::Free);
        assert!(storage.get_table("missing").unwrap().is_none());
    }

    #[test]
    fn test_uncommitted_writes_are_discarded() {
        let storage = FloorStorage::open_in_memory().unwrap();

        let table = test_table("t1", 1);
        let txn = storage.begin_write().unwrap();
        storage.store_table(&txn, &table).unwrap();
        drop(txn); // abort

        assert!(storage.get_table("t1").unwrap().is_none());
    }

    #[test]
    fn test_order_roundtrip() {
        let storage = FloorStorage::open_in_memory().unwrap();

        let order = test_order("o1", "t1");
        let txn = storage.begin_write().unwrap();
        storage.store_order(&txn, &order).unwrap();
        txn.commit().unwrap();

        let loaded = storage.get_order("o1").unwrap().unwrap();
        assert_eq!(loaded.table_id, "t1");
        assert_eq!(loaded.status, OrderStatus::Pending);
    }

    #[test]
    fn test_bill_index_binds_one_bill_per_order() {
        let storage = FloorStorage::open_in_memory().unwrap();

        let bill = test_bill("b1", "o1");
        let txn = storage.begin_write().unwrap();
        storage.store_bill(&txn, &bill).unwrap();
        storage.index_bill_for_order(&txn, "o1", "b1").unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.bill_id_for_order("o1").unwrap().as_deref(), Some("b1"));
        assert!(storage.bill_id_for_order("o2").unwrap().is_none());
    }

    #[test]
    fn test_menu_item_crud() {
        let storage = FloorStorage::open_in_memory().unwrap();

        let item = MenuItem {
            id: "m1".to_string(),
            name: "Margherita".to_string(),
            description: None,
            price: 8.99,
            category: "main_course".to_string(),
            is_available: true,
            created_at: now_millis(),
            updated_at: now_millis(),
        };
        storage.store_menu_item(&item).unwrap();

        let loaded = storage.get_menu_item("m1").unwrap().unwrap();
        assert_eq!(loaded.price, 8.99);

        assert!(storage.remove_menu_item("m1").unwrap());
        assert!(!storage.remove_menu_item("m1").unwrap());
        assert!(storage.get_menu_item("m1").unwrap().is_none());
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor.redb");

        {
            let storage = FloorStorage::open(&path).unwrap();
            let txn = storage.begin_write().unwrap();
            storage.store_table(&txn, &test_table("t1", 1)).unwrap();
            txn.commit().unwrap();
        }

        let reopened = FloorStorage::open(&path).unwrap();
        let loaded = reopened.get_table("t1").unwrap().unwrap();
        assert_eq!(loaded.number, 1);
    }

    #[test]
    fn test_stats() {
        let storage = FloorStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.store_table(&txn, &test_table("t1", 1)).unwrap();
        storage.store_table(&txn, &test_table("t2", 2)).unwrap();
        storage.store_order(&txn, &test_order("o1", "t1")).unwrap();
        txn.commit().unwrap();

        let stats = storage.get_stats().unwrap();
        assert_eq!(stats.table_count, 2);
        assert_eq!(stats.order_count, 1);
        assert_eq!(stats.bill_count, 0);
    }
}

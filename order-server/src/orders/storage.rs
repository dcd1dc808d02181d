//! redb-based storage layer for orders
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` (JSON) | Order records |
//! | `user_orders` | `(user_id, order_id)` | `()` | Per-user order index |
//! | `all_orders` | `order_id` | `()` | Global order index |
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns (copy-on-write
//! with atomic pointer swap), so [`OrderStorage::insert_order`] is the
//! commit boundary: once it returns, the order record and both index
//! entries exist together or not at all.
//!
//! Single-key operations are atomic; two writers touching the same order id
//! are last-write-wins with no version check.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::Order;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for order records: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for the per-user index: key = (user_id, order_id), value = empty
const USER_ORDERS_TABLE: TableDefinition<(&str, &str), ()> = TableDefinition::new("user_orders");

/// Table for the global index: key = order_id, value = empty
const ALL_ORDERS_TABLE: TableDefinition<&str, ()> = TableDefinition::new("all_orders");

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

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl OrderStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init_tables(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(db)
    }

    fn init_tables(db: Database) -> StorageResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(USER_ORDERS_TABLE)?;
            let _ = write_txn.open_table(ALL_ORDERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Write Operations ==========

    /// Commit a new order: the record plus both index entries, one transaction
    pub fn insert_order(&self, order: &Order) -> StorageResult<()> {
        let value = serde_json::to_vec(order)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut orders = write_txn.open_table(ORDERS_TABLE)?;
            orders.insert(order.id.as_str(), value.as_slice())?;

            let mut user_index = write_txn.open_table(USER_ORDERS_TABLE)?;
            user_index.insert((order.user_id.as_str(), order.id.as_str()), ())?;

            let mut all_index = write_txn.open_table(ALL_ORDERS_TABLE)?;
            all_index.insert(order.id.as_str(), ())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    /// Overwrite an existing order record
    ///
    /// Index entries are keyed by immutable fields and never need updating.
    pub fn put_order(&self, order: &Order) -> StorageResult<()> {
        let value = serde_json::to_vec(order)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut orders = write_txn.open_table(ORDERS_TABLE)?;
            orders.insert(order.id.as_str(), value.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    // ========== Read Operations ==========

    /// Get an order by id
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => {
                let order: Order = serde_json::from_slice(value.value())?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Get all orders for a user via the per-user index
    ///
    /// Index entries whose order record is missing are skipped.
    pub fn orders_for_user(&self, user_id: &str) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(USER_ORDERS_TABLE)?;
        let orders_table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in index.range((user_id, "")..)? {
            let (key, _value) = result?;
            let (uid, order_id) = key.value();
            if uid != user_id {
                break;
            }
            if let Some(value) = orders_table.get(order_id)? {
                let order: Order = serde_json::from_slice(value.value())?;
                orders.push(order);
            }
        }

        Ok(orders)
    }

    /// Get every order id in the global index
    pub fn all_order_ids(&self) -> StorageResult<Vec<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ALL_ORDERS_TABLE)?;

        let mut ids = Vec::new();
        for result in table.iter()? {
            let (key, _value) = result?;
            ids.push(key.value().to_string());
        }

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::{OrderItem, OrderStatus};

    fn create_test_order(id: &str, user_id: &str) -> Order {
        Order {
            id: id.to_string(),
            user_id: user_id.to_string(),
            items: vec![OrderItem {
                product_id: "p1".to_string(),
                product_name: "Widget".to_string(),
                price: 10.0,
                quantity: 2,
                subtotal: 20.0,
            }],
            total_amount: 20.0,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            error: None,
        }
    }

    #[test]
    fn test_insert_and_get_order() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = create_test_order("order-1", "user-1");

        storage.insert_order(&order).unwrap();

        let loaded = storage.get_order("order-1").unwrap().unwrap();
        assert_eq!(loaded.id, "order-1");
        assert_eq!(loaded.user_id, "user-1");
        assert_eq!(loaded.status, OrderStatus::Pending);
        assert_eq!(loaded.items.len(), 1);
    }

    #[test]
    fn test_get_missing_order() {
        let storage = OrderStorage::open_in_memory().unwrap();
        assert!(storage.get_order("nope").unwrap().is_none());
    }

    #[test]
    fn test_user_index_isolates_users() {
        let storage = OrderStorage::open_in_memory().unwrap();

        storage.insert_order(&create_test_order("order-1", "user-a")).unwrap();
        storage.insert_order(&create_test_order("order-2", "user-a")).unwrap();
        storage.insert_order(&create_test_order("order-3", "user-b")).unwrap();

        let a_orders = storage.orders_for_user("user-a").unwrap();
        assert_eq!(a_orders.len(), 2);
        assert!(a_orders.iter().all(|o| o.user_id == "user-a"));

        let b_orders = storage.orders_for_user("user-b").unwrap();
        assert_eq!(b_orders.len(), 1);

        assert!(storage.orders_for_user("user-c").unwrap().is_empty());
    }

    #[test]
    fn test_user_index_prefix_is_not_a_match() {
        // "user-a" must not pick up "user-ab"'s orders
        let storage = OrderStorage::open_in_memory().unwrap();

        storage.insert_order(&create_test_order("order-1", "user-a")).unwrap();
        storage.insert_order(&create_test_order("order-2", "user-ab")).unwrap();

        let orders = storage.orders_for_user("user-a").unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, "order-1");
    }

    #[test]
    fn test_put_order_overwrites_record() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let mut order = create_test_order("order-1", "user-1");
        storage.insert_order(&order).unwrap();

        order.status = OrderStatus::PendingReview;
        order.error = Some("Stock update failed".to_string());
        storage.put_order(&order).unwrap();

        let loaded = storage.get_order("order-1").unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::PendingReview);
        assert_eq!(loaded.error.as_deref(), Some("Stock update failed"));

        // Overwrite must not duplicate index entries
        assert_eq!(storage.orders_for_user("user-1").unwrap().len(), 1);
        assert_eq!(storage.all_order_ids().unwrap().len(), 1);
    }

    #[test]
    fn test_global_index() {
        let storage = OrderStorage::open_in_memory().unwrap();

        storage.insert_order(&create_test_order("order-1", "user-a")).unwrap();
        storage.insert_order(&create_test_order("order-2", "user-b")).unwrap();

        let mut ids = storage.all_order_ids().unwrap();
        ids.sort();
        assert_eq!(ids, vec!["order-1", "order-2"]);
    }

    #[test]
    fn test_open_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.redb");

        {
            let storage = OrderStorage::open(&path).unwrap();
            storage.insert_order(&create_test_order("order-1", "user-1")).unwrap();
        }

        let storage = OrderStorage::open(&path).unwrap();
        let loaded = storage.get_order("order-1").unwrap();
        assert!(loaded.is_some());
    }
}

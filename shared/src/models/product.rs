//! Product Model
//!
//! The order service's view of the inventory service's product entity.
//! Orders never hold a live reference to a product; validation copies
//! `name` and `price` into the order item snapshot and forgets the rest.

use serde::{Deserialize, Serialize};

/// Product as served by the inventory service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Unit price in currency unit
    pub price: f64,
    /// Units currently on hand; may go negative under concurrent orders
    /// (the documented oversell window)
    pub stock: i64,
}

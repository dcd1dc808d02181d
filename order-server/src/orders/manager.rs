//! OrdersManager - order validation, commit, settlement, cancellation
//!
//! # Creation Flow
//!
//! ```text
//! create_order(user_id, items)
//!     ├─ 1. Reject empty item lists and non-positive quantities
//!     ├─ 2. Validation: fetch every product concurrently (join barrier),
//!     │     fail fast on the first missing product / insufficient stock —
//!     │     nothing is persisted on failure
//!     ├─ 3. Commit: id + timestamps + pending, one redb transaction
//!     │     (record + user index + global index) — point of no return
//!     ├─ 4. Settlement: debit stock concurrently (join barrier); any
//!     │     failure demotes the order to pending_review with a diagnostic,
//!     │     never deletes or retries it
//!     └─ 5. Return the committed (possibly degraded) order
//! ```
//!
//! Cancellation mirrors settlement with credits: compensation failures are
//! logged and recorded on the order, but the order still ends `cancelled`.
//!
//! No lock spans the validate→settle sequence, so two concurrent orders can
//! both pass validation against the same stock and oversell. That window is
//! documented behavior; closing it would be a deliberate design change at
//! the inventory boundary.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use uuid::Uuid;

use crate::inventory::{InventoryApi, InventoryError};
use crate::orders::storage::{OrderStorage, StorageError};
use crate::utils::money;
use shared::AppError;
use shared::models::{Order, OrderItem, OrderItemRequest, OrderStatus, StockAdjustment};
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Inventory call failed: {0}")]
    Inventory(#[from] InventoryError),

    #[error("Order items are required")]
    EmptyOrder,

    #[error("Quantity for product {product_id} must be positive")]
    InvalidQuantity { product_id: String },

    #[error("Product {0} not found")]
    ProductNotFound(String),

    #[error("Insufficient stock for product {name}")]
    InsufficientStock { name: String },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Only pending orders can be cancelled (current status: {status})")]
    NotCancellable { status: OrderStatus },

    #[error(
        "Invalid status value: {value}. Valid values: pending, processing, shipped, delivered, cancelled"
    )]
    InvalidStatus { value: String },

    #[error("Cannot change order status from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },
}

pub type ManagerResult<T> = Result<T, ManagerError>;

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        let message = err.to_string();
        match err {
            ManagerError::Storage(e) => AppError::database(e.to_string()),
            ManagerError::Inventory(e) => AppError::internal(e.to_string()),
            ManagerError::OrderNotFound(_) => AppError::not_found("Order"),
            ManagerError::EmptyOrder
            | ManagerError::InvalidQuantity { .. }
            | ManagerError::ProductNotFound(_)
            | ManagerError::InsufficientStock { .. } => AppError::validation(message),
            ManagerError::NotCancellable { .. }
            | ManagerError::InvalidStatus { .. }
            | ManagerError::IllegalTransition { .. } => AppError::invalid(message),
        }
    }
}

/// Order orchestration and queries
///
/// Owns the order store and the inventory client; both are constructed at
/// startup and passed in, never reached through globals.
pub struct OrdersManager {
    storage: OrderStorage,
    inventory: Arc<dyn InventoryApi>,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &"<OrderStorage>")
            .finish()
    }
}

impl OrdersManager {
    pub fn new(storage: OrderStorage, inventory: Arc<dyn InventoryApi>) -> Self {
        Self { storage, inventory }
    }

    // ========== Creation ==========

    /// Validate, commit, and settle a new order
    pub async fn create_order(
        &self,
        user_id: &str,
        items: &[OrderItemRequest],
    ) -> ManagerResult<Order> {
        if items.is_empty() {
            return Err(ManagerError::EmptyOrder);
        }
        for item in items {
            if item.quantity == 0 {
                return Err(ManagerError::InvalidQuantity {
                    product_id: item.product_id.clone(),
                });
            }
        }

        let order_items = self.validate_items(items).await?;
        let total_amount = money::order_total(&order_items);

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            items: order_items,
            total_amount,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
            error: None,
        };

        // Commit boundary: after this write the order exists for readers
        // regardless of what settlement does.
        self.storage.insert_order(&order)?;
        tracing::info!(
            order_id = %order.id,
            user_id,
            total = total_amount,
            "Order committed"
        );

        self.settle_order(order).await
    }

    /// Validation phase: concurrent product fetches behind a join barrier.
    ///
    /// All-or-nothing: the first failed item (in request order, which keeps
    /// "first detected" deterministic) rejects the whole order. On success
    /// every item carries a price/name snapshot taken at this instant.
    async fn validate_items(&self, items: &[OrderItemRequest]) -> ManagerResult<Vec<OrderItem>> {
        let fetches = items
            .iter()
            .map(|item| self.inventory.fetch_product(&item.product_id));
        let results = join_all(fetches).await;

        let mut order_items = Vec::with_capacity(items.len());
        for (request, result) in items.iter().zip(results) {
            let product = result?
                .ok_or_else(|| ManagerError::ProductNotFound(request.product_id.clone()))?;

            if product.stock < i64::from(request.quantity) {
                return Err(ManagerError::InsufficientStock { name: product.name });
            }

            order_items.push(OrderItem {
                product_id: product.id,
                product_name: product.name,
                price: product.price,
                quantity: request.quantity,
                subtotal: money::item_subtotal(product.price, request.quantity),
            });
        }

        Ok(order_items)
    }

    /// Settlement phase: debit stock for every item, best effort.
    ///
    /// Runs after commit; its outcome never fails the creation. Any failed
    /// debit demotes the order to `pending_review` with the failed products
    /// recorded for out-of-band reconciliation.
    async fn settle_order(&self, mut order: Order) -> ManagerResult<Order> {
        let adjustments: Vec<StockAdjustment> = order
            .items
            .iter()
            .map(|item| StockAdjustment::debit(&item.product_id, item.quantity))
            .collect();

        let failed = self.apply_adjustments(&adjustments).await;
        if !failed.is_empty() {
            tracing::error!(
                order_id = %order.id,
                products = ?failed,
                "Stock settlement failed, order needs manual review"
            );
            order.status = OrderStatus::PendingReview;
            order.error = Some(format!(
                "Stock update failed for {}; requires manual review",
                failed.join(", ")
            ));
            order.updated_at = Utc::now();
            self.storage.put_order(&order)?;
        }

        Ok(order)
    }

    /// Fan out stock adjustments behind a join barrier.
    ///
    /// Returns the product ids whose adjustment failed after retries.
    async fn apply_adjustments(&self, adjustments: &[StockAdjustment]) -> Vec<String> {
        let calls = adjustments.iter().map(|adj| self.inventory.adjust_stock(adj));
        let results = join_all(calls).await;

        adjustments
            .iter()
            .zip(results)
            .filter_map(|(adj, result)| match result {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!(
                        product_id = %adj.product_id,
                        delta = adj.quantity,
                        error = %e,
                        "Stock adjustment failed"
                    );
                    Some(adj.product_id.clone())
                }
            })
            .collect()
    }

    // ========== Cancellation ==========

    /// Cancel a pending order, restoring stock for its items.
    ///
    /// Compensation is fire-and-forget with respect to the outcome: failed
    /// credits are logged and recorded on the order, but the order reaches
    /// `cancelled` unconditionally once the credits have been issued.
    pub async fn cancel_order(&self, order_id: &str) -> ManagerResult<Order> {
        let mut order = self
            .storage
            .get_order(order_id)?
            .ok_or_else(|| ManagerError::OrderNotFound(order_id.to_string()))?;

        if order.status != OrderStatus::Pending {
            return Err(ManagerError::NotCancellable {
                status: order.status,
            });
        }

        let adjustments: Vec<StockAdjustment> = order
            .items
            .iter()
            .map(|item| StockAdjustment::credit(&item.product_id, item.quantity))
            .collect();

        let failed = self.apply_adjustments(&adjustments).await;
        if !failed.is_empty() {
            order.error = Some(format!("Stock restore failed for {}", failed.join(", ")));
        }

        order.status = OrderStatus::Cancelled;
        order.updated_at = Utc::now();
        self.storage.put_order(&order)?;
        tracing::info!(order_id = %order.id, "Order cancelled");

        Ok(order)
    }

    // ========== Status Transitions ==========

    /// Apply a caller-requested status change through the transition table
    pub async fn update_status(&self, order_id: &str, requested: &str) -> ManagerResult<Order> {
        let mut order = self
            .storage
            .get_order(order_id)?
            .ok_or_else(|| ManagerError::OrderNotFound(order_id.to_string()))?;

        let next = OrderStatus::parse_settable(requested).ok_or_else(|| {
            ManagerError::InvalidStatus {
                value: requested.to_string(),
            }
        })?;

        if !order.status.can_transition_to(next) {
            return Err(ManagerError::IllegalTransition {
                from: order.status,
                to: next,
            });
        }

        order.status = next;
        order.updated_at = Utc::now();
        self.storage.put_order(&order)?;

        Ok(order)
    }

    // ========== Queries ==========

    /// Direct lookup; `None` for an unknown id
    pub fn get_order(&self, order_id: &str) -> ManagerResult<Option<Order>> {
        Ok(self.storage.get_order(order_id)?)
    }

    /// All orders of a user, newest first (id ascending breaks ties)
    pub fn list_orders(&self, user_id: &str) -> ManagerResult<Vec<Order>> {
        let mut orders = self.storage.orders_for_user(user_id)?;
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(orders)
    }
}

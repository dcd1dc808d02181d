//! Inventory service client
//!
//! Typed interface to the external product/inventory service. The order
//! manager only sees [`InventoryApi`]; the HTTP implementation lives in
//! [`client`]. The collaborator owns stock atomicity — this side issues
//! fetches and signed deltas, it never serializes them.

mod client;

pub use client::HttpInventoryClient;

use async_trait::async_trait;
use shared::models::{Product, StockAdjustment};
use thiserror::Error;

/// Inventory call errors
///
/// Anything that survives the retry budget. Validation-level conditions
/// (product absent, insufficient stock) are not errors here; absence is an
/// `Ok(None)` from [`InventoryApi::fetch_product`].
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Inventory service returned {status}: {message}")]
    Upstream { status: u16, message: String },
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Interface to the external inventory service
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Fetch a product by id. `Ok(None)` means the product does not exist.
    async fn fetch_product(&self, product_id: &str) -> InventoryResult<Option<Product>>;

    /// Apply a signed stock delta to a product.
    ///
    /// The adjustment must be applied atomically relative to concurrent
    /// adjustments on the same product; that guarantee belongs to the
    /// inventory service, not to this client.
    async fn adjust_stock(&self, adjustment: &StockAdjustment) -> InventoryResult<()>;
}

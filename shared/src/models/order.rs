//! Order Model
//!
//! The order entity, its embedded items, and the status state machine.
//! Field names serialize in camelCase to match the public API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status
///
/// `pending` is the initial status. `delivered` and `cancelled` are
/// terminal. `pending_review` marks an order whose stock settlement could
/// not be fully confirmed; it is only ever set internally and needs an
/// out-of-band reconciliation step before it moves on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    PendingReview,
}

impl OrderStatus {
    /// Status values a caller may request through the API.
    ///
    /// `pending_review` is deliberately absent: it is reachable only via a
    /// failed settlement, never by request.
    pub const SETTABLE: [&'static str; 5] =
        ["pending", "processing", "shipped", "delivered", "cancelled"];

    /// Parse a caller-supplied status value against the whitelist.
    ///
    /// Returns `None` for anything outside [`Self::SETTABLE`], including
    /// `pending_review`.
    pub fn parse_settable(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether this status admits no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Transition table keyed by (current, requested).
    ///
    /// Nothing moves back to `pending`, there are no self-loops, and
    /// `pending_review` can only be entered from `pending`.
    pub fn can_transition_to(self, next: Self) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing | Shipped | Delivered | Cancelled | PendingReview)
                | (PendingReview, Processing | Shipped | Delivered | Cancelled)
                | (Processing, Shipped | Delivered | Cancelled)
                | (Shipped, Delivered | Cancelled)
        )
    }

    /// Wire representation of this status
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::PendingReview => "pending_review",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order line item
///
/// `product_name` and `price` are snapshots taken when the order was
/// validated; they are never re-fetched from the inventory service.
/// `subtotal` is always `price * quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub price: f64,
    pub quantity: u32,
    pub subtotal: f64,
}

/// Order entity
///
/// Owned by the order store once committed. `updated_at` moves on every
/// mutation; `error` is only set when settlement or compensation degrades.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Signed stock delta for one product
///
/// Ephemeral: built for a settlement or compensation call, never stored.
/// Negative quantity debits stock (order creation), positive credits it
/// back (cancellation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustment {
    pub product_id: String,
    pub quantity: i64,
}

impl StockAdjustment {
    /// Debit adjustment for a newly created order item
    pub fn debit(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity: -i64::from(quantity),
        }
    }

    /// Credit adjustment restoring stock for a cancelled item
    pub fn credit(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity: i64::from(quantity),
        }
    }
}

/// One requested line in an order creation call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

/// Update status payload
///
/// `status` stays a raw string so unknown values reach the whitelist check
/// and come back as a domain error instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

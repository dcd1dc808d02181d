//! Shared types for the order coordination service
//!
//! Common types used by the server and clients: the order data model,
//! the inventory product view, the unified response envelope, and the
//! application error type with its HTTP mapping.

pub mod error;
pub mod models;
pub mod response;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult};
pub use models::{Order, OrderItem, OrderStatus, Product, StockAdjustment};
pub use response::ApiResponse;

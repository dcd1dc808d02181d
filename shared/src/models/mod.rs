//! Data models

pub mod order;
pub mod product;

pub use order::{
    CreateOrderRequest, Order, OrderItem, OrderItemRequest, OrderStatus, StockAdjustment,
    UpdateStatusRequest,
};
pub use product::Product;

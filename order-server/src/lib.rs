//! Order Server - 订单协调服务
//!
//! Coordinates multi-item orders against an external inventory service,
//! with an embedded key-value store as the source of truth for order state.
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/        # 配置、状态、服务器
//! ├── api/         # HTTP 路由和处理器
//! ├── inventory/   # 库存服务客户端
//! ├── orders/      # 订单存储与编排
//! └── utils/       # 日志、金额计算
//! ```

pub mod api;
pub mod core;
pub mod inventory;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use inventory::{HttpInventoryClient, InventoryApi};
pub use orders::{OrderStorage, OrdersManager};
pub use shared::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}

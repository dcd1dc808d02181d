use std::sync::Arc;

use crate::core::{Config, Result};
use crate::inventory::HttpInventoryClient;
use crate::orders::{OrderStorage, OrdersManager};

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 在启动时被显式构造并传入路由层，取代模块级单例：
/// 存储和库存客户端的生命周期由它统一管理 (构造 → 使用 → 随进程结束)。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Arc<Config> | 配置项 (不可变) |
/// | orders | Arc<OrdersManager> | 订单编排与查询 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub orders: Arc<OrdersManager>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 创建工作目录，打开订单数据库，构建库存服务客户端。
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let storage = OrderStorage::open(config.orders_db_path())?;
        tracing::info!(path = %config.orders_db_path().display(), "Order storage opened");

        let inventory = HttpInventoryClient::new(config);
        tracing::info!(url = %config.inventory_url, "Inventory service client ready");

        let orders = OrdersManager::new(storage, Arc::new(inventory));

        Ok(Self {
            config: Arc::new(config.clone()),
            orders: Arc::new(orders),
        })
    }
}

/// 服务器配置 - 订单服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/order-server | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3002 | HTTP 服务端口 |
/// | INVENTORY_SERVICE_URL | http://localhost:3001 | 库存服务地址 |
/// | INVENTORY_TIMEOUT_MS | 5000 | 单次库存调用超时(毫秒) |
/// | INVENTORY_RETRIES | 2 | 瞬时失败的重试次数 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/orders HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储订单数据库和日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 库存服务 URL
    pub inventory_url: String,
    /// 单次库存调用超时 (毫秒)
    pub inventory_timeout_ms: u64,
    /// 瞬时失败 (网络/5xx) 的重试次数，超出后按调用失败处理
    pub inventory_retries: u32,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/order-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3002),
            inventory_url: std::env::var("INVENTORY_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".into()),
            inventory_timeout_ms: std::env::var("INVENTORY_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            inventory_retries: std::env::var("INVENTORY_RETRIES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(2),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 订单数据库文件路径
    pub fn orders_db_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("orders.redb")
    }
}

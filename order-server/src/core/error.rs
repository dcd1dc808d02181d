use crate::orders::StorageError;
use thiserror::Error;

/// 服务器启动/运行期错误
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// 核心层 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;

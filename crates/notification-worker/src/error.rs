//! 工作者错误类型
//!
//! 区分输入错误（读取、解析、校验）与分发错误，
//! 便于在批量汇总中给出可读的失败原因。

use orvium_notifications::error::NotificationError;
use orvium_shared::error::PlatformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("读取输入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("事件信封解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("事件信封校验失败: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Notification(#[from] NotificationError),

    #[error("配置加载失败: {0}")]
    Config(#[from] PlatformError),

    #[error("投递失败: {failed}/{total} 个渠道投递失败")]
    DeliveryFailed { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, WorkerError>;

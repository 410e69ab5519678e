//! 通知渠道
//!
//! 定义渠道 trait 并提供四个进程内渠道实现：
//!
//! - **InApp**: 按用户保存的站内通知收件箱
//! - **Email**: 校验收件地址并写入发件箱
//! - **Push**: 推送发件箱
//! - **History**: 出版物历史时间线
//!
//! 真实的 SMTP 与推送服务接入不在本 crate 范围内，发件箱可供调用方取出后转交。

mod email;
mod history;
mod in_app;
mod push;

pub use email::{EmailChannel, SentEmail};
pub use history::{HistoryChannel, HistoryEntry};
pub use in_app::InAppChannel;
pub use push::{PushChannel, SentPush};

use async_trait::async_trait;

use crate::catalog::Channel;
use crate::error::{NotificationError, Result};
use crate::types::{ChannelResult, Delivery};

/// 通知渠道 trait
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// 渠道类型
    fn channel(&self) -> Channel;

    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 渠道是否可以处理这次投递
    ///
    /// 例如邮件渠道要求接收人有邮箱地址
    async fn is_available(&self, delivery: &Delivery) -> bool;

    /// 执行投递
    ///
    /// 投递失败返回 `ChannelResult::failed`，`Err` 只用于渠道自身的异常
    async fn deliver(&self, delivery: &Delivery) -> Result<ChannelResult>;
}

/// 渠道配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub enabled: bool,
}

impl ChannelConfig {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new(true)
    }
}

/// 载荷类型与渠道不匹配，属于渠道自身的异常
fn unexpected_payload(channel: Channel, delivery: &Delivery) -> NotificationError {
    NotificationError::SendFailed {
        channel: channel.to_string(),
        reason: format!("unexpected {} payload", delivery.channel()),
    }
}

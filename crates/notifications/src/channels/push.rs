//! 推送通知渠道

use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{ChannelConfig, NotificationChannel, unexpected_payload};
use crate::catalog::Channel;
use crate::error::Result;
use crate::payload::PushNotification;
use crate::types::{ChannelResult, Delivery, DeliveryContent};

/// 推送发件箱中的一条记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPush {
    pub message_id: String,
    pub user_id: String,
    pub notification: PushNotification,
}

/// 推送通知渠道
///
/// 需要接收人有用户 ID（订阅信息按用户保存）
pub struct PushChannel {
    config: ChannelConfig,
    /// 覆盖载荷中的默认图标
    icon: Option<String>,
    outbox: Mutex<Vec<SentPush>>,
}

impl PushChannel {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            icon: None,
            outbox: Mutex::new(Vec::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ChannelConfig::default())
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn outbox(&self) -> Vec<SentPush> {
        self.outbox.lock().clone()
    }

    fn user_id<'a>(&self, delivery: &'a Delivery) -> Option<&'a str> {
        delivery.recipient.as_ref()?.user_id.as_deref()
    }
}

#[async_trait]
impl NotificationChannel for PushChannel {
    fn channel(&self) -> Channel {
        Channel::Push
    }

    fn name(&self) -> &str {
        "Push"
    }

    async fn is_available(&self, delivery: &Delivery) -> bool {
        if !self.config.enabled {
            warn!(delivery_id = %delivery.delivery_id, "推送渠道已禁用");
            return false;
        }
        self.user_id(delivery).is_some()
    }

    async fn deliver(&self, delivery: &Delivery) -> Result<ChannelResult> {
        let start = Instant::now();

        if !self.is_available(delivery).await {
            return Ok(ChannelResult::skipped(
                self.channel(),
                "channel disabled or recipient has no user id",
            ));
        }

        let DeliveryContent::Push(notification) = &delivery.content else {
            return Err(unexpected_payload(self.channel(), delivery));
        };
        let Some(user_id) = self.user_id(delivery) else {
            return Ok(ChannelResult::skipped(self.channel(), "no user id"));
        };

        let mut notification = notification.clone();
        if let Some(icon) = &self.icon {
            notification.icon = icon.clone();
        }

        let message_id = format!("push_{}", Uuid::new_v4());
        debug!(
            delivery_id = %delivery.delivery_id,
            user_id,
            message_id = %message_id,
            "推送已写入发件箱"
        );
        self.outbox.lock().push(SentPush {
            message_id: message_id.clone(),
            user_id: user_id.to_string(),
            notification,
        });

        Ok(ChannelResult::success(
            self.channel(),
            Some(message_id),
            start.elapsed().as_millis() as u64,
        ))
    }
}

//! 站内通知渠道

use std::time::Instant;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, warn};

use super::{ChannelConfig, NotificationChannel, unexpected_payload};
use crate::catalog::Channel;
use crate::error::Result;
use crate::payload::InAppNotification;
use crate::types::{ChannelResult, Delivery, DeliveryContent};

/// 站内通知渠道
///
/// 按用户 ID 保存通知，供前端拉取
pub struct InAppChannel {
    config: ChannelConfig,
    inbox: DashMap<String, Vec<InAppNotification>>,
}

impl InAppChannel {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            inbox: DashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ChannelConfig::default())
    }

    /// 某用户的全部站内通知
    pub fn inbox(&self, user_id: &str) -> Vec<InAppNotification> {
        self.inbox
            .get(user_id)
            .map(|n| n.value().clone())
            .unwrap_or_default()
    }

    pub fn unread_count(&self, user_id: &str) -> usize {
        self.inbox
            .get(user_id)
            .map(|n| n.iter().filter(|n| !n.is_read).count())
            .unwrap_or(0)
    }

    /// 标记某用户的全部通知为已读，返回被标记的数量
    pub fn mark_all_read(&self, user_id: &str) -> usize {
        let Some(mut notifications) = self.inbox.get_mut(user_id) else {
            return 0;
        };
        let mut marked = 0;
        for notification in notifications.iter_mut().filter(|n| !n.is_read) {
            notification.is_read = true;
            marked += 1;
        }
        marked
    }
}

#[async_trait]
impl NotificationChannel for InAppChannel {
    fn channel(&self) -> Channel {
        Channel::InApp
    }

    fn name(&self) -> &str {
        "In-App"
    }

    async fn is_available(&self, delivery: &Delivery) -> bool {
        if !self.config.enabled {
            warn!(delivery_id = %delivery.delivery_id, "站内通知渠道已禁用");
            return false;
        }
        true
    }

    async fn deliver(&self, delivery: &Delivery) -> Result<ChannelResult> {
        let start = Instant::now();

        if !self.is_available(delivery).await {
            return Ok(ChannelResult::skipped(self.channel(), "channel disabled"));
        }

        let DeliveryContent::InApp(notification) = &delivery.content else {
            return Err(unexpected_payload(self.channel(), delivery));
        };

        debug!(
            delivery_id = %delivery.delivery_id,
            user_id = %notification.user_id,
            title = %notification.title,
            "写入站内通知"
        );

        self.inbox
            .entry(notification.user_id.clone())
            .or_default()
            .push(notification.clone());

        Ok(ChannelResult::success(
            self.channel(),
            Some(format!("inapp_{}", delivery.delivery_id)),
            start.elapsed().as_millis() as u64,
        ))
    }
}

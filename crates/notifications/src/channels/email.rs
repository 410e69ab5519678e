//! 邮件通知渠道
//!
//! 校验收件地址后写入发件箱，真实的 SMTP 发送由外部组件从发件箱取出完成。

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use super::{ChannelConfig, NotificationChannel, unexpected_payload};
use crate::catalog::Channel;
use crate::error::Result;
use crate::types::{ChannelResult, Delivery, DeliveryContent};

/// 发件箱中的一封邮件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentEmail {
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub sent_at: DateTime<Utc>,
}

/// 邮件通知渠道
pub struct EmailChannel {
    config: ChannelConfig,
    /// `Name <address>` 格式的发件人
    from: String,
    outbox: Mutex<Vec<SentEmail>>,
}

impl EmailChannel {
    pub fn new(config: ChannelConfig, from_name: &str, from_address: &str) -> Self {
        Self {
            config,
            from: format!("{from_name} <{from_address}>"),
            outbox: Mutex::new(Vec::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ChannelConfig::default(), "Orvium", "no-reply@orvium.io")
    }

    pub fn sender(&self) -> &str {
        &self.from
    }

    /// 发件箱快照
    pub fn outbox(&self) -> Vec<SentEmail> {
        self.outbox.lock().clone()
    }

    /// 取出并清空发件箱
    pub fn drain(&self) -> Vec<SentEmail> {
        std::mem::take(&mut *self.outbox.lock())
    }

    fn address<'a>(&self, delivery: &'a Delivery) -> Option<&'a str> {
        delivery.recipient.as_ref()?.email.as_deref()
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    fn name(&self) -> &str {
        "Email"
    }

    async fn is_available(&self, delivery: &Delivery) -> bool {
        if !self.config.enabled {
            warn!(delivery_id = %delivery.delivery_id, "邮件渠道已禁用");
            return false;
        }
        self.address(delivery).is_some()
    }

    async fn deliver(&self, delivery: &Delivery) -> Result<ChannelResult> {
        let start = Instant::now();

        if !self.is_available(delivery).await {
            return Ok(ChannelResult::skipped(
                self.channel(),
                "channel disabled or recipient has no email address",
            ));
        }

        let DeliveryContent::Email(payload) = &delivery.content else {
            return Err(unexpected_payload(self.channel(), delivery));
        };
        let Some(to) = self.address(delivery) else {
            return Ok(ChannelResult::skipped(self.channel(), "no email address"));
        };

        if !to.validate_email() {
            warn!(delivery_id = %delivery.delivery_id, to, "收件地址无效");
            return Ok(ChannelResult::failed(
                self.channel(),
                format!("invalid recipient: {to}"),
                start.elapsed().as_millis() as u64,
            ));
        }

        let message_id = format!("email_{}", Uuid::new_v4());
        self.outbox.lock().push(SentEmail {
            message_id: message_id.clone(),
            from: self.from.clone(),
            to: to.to_string(),
            subject: payload.subject.clone(),
            html: payload.html.clone(),
            sent_at: Utc::now(),
        });

        info!(
            delivery_id = %delivery.delivery_id,
            message_id = %message_id,
            subject = %payload.subject,
            "邮件已写入发件箱"
        );

        Ok(ChannelResult::success(
            self.channel(),
            Some(message_id),
            start.elapsed().as_millis() as u64,
        ))
    }
}

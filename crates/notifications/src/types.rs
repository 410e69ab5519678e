//! 分发相关的数据结构
//!
//! 接收人、单次投递、渠道结果与分发报告。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::catalog::{Channel, EventType};
use crate::payload::{EmailPayload, HistoryLine, InAppNotification, PushNotification};

fn default_true() -> bool {
    true
}

/// 通知接收人
///
/// 有 `user_id` 才能接收站内通知和推送，有 `email` 才能接收邮件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    /// 是否接收社区类邮件
    #[serde(default = "default_true")]
    pub receives_community_emails: bool,
}

impl Recipient {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            email: None,
            receives_community_emails: true,
        }
    }

    pub fn email_only(email: impl Into<String>) -> Self {
        Self {
            user_id: None,
            email: Some(email.into()),
            receives_community_emails: true,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// 退订社区类邮件
    pub fn opted_out(mut self) -> Self {
        self.receives_community_emails = false;
        self
    }

    /// 日志中标识接收人
    pub fn label(&self) -> String {
        self.user_id
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| "anonymous".to_string())
    }
}

/// 投递内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryContent {
    InApp(InAppNotification),
    Email(EmailPayload),
    Push(PushNotification),
    History(HistoryLine),
}

impl DeliveryContent {
    pub fn channel(&self) -> Channel {
        match self {
            Self::InApp(_) => Channel::InApp,
            Self::Email(_) => Channel::Email,
            Self::Push(_) => Channel::Push,
            Self::History(_) => Channel::History,
        }
    }
}

/// 单次渠道投递
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub delivery_id: String,
    pub event_type: EventType,
    /// 历史记录投递没有接收人
    pub recipient: Option<Recipient>,
    pub content: DeliveryContent,
}

impl Delivery {
    pub fn new(event_type: EventType, recipient: Option<Recipient>, content: DeliveryContent) -> Self {
        Self {
            delivery_id: Uuid::now_v7().to_string(),
            event_type,
            recipient,
            content,
        }
    }

    pub fn channel(&self) -> Channel {
        self.content.channel()
    }

    pub fn recipient_label(&self) -> Option<String> {
        self.recipient.as_ref().map(Recipient::label)
    }
}

/// 发送状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendStatus {
    Success,
    Failed,
    /// 渠道未注册、已禁用或接收人不满足条件
    Skipped,
}

impl SendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// 单渠道投递结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResult {
    pub channel: Channel,
    pub status: SendStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 渠道生成的消息 ID（成功时）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_message_id: Option<String>,
    pub duration_ms: u64,
}

impl ChannelResult {
    pub fn success(channel: Channel, external_message_id: Option<String>, duration_ms: u64) -> Self {
        Self {
            channel,
            status: SendStatus::Success,
            recipient: None,
            error: None,
            external_message_id,
            duration_ms,
        }
    }

    pub fn failed(channel: Channel, error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            channel,
            status: SendStatus::Failed,
            recipient: None,
            error: Some(error.into()),
            external_message_id: None,
            duration_ms,
        }
    }

    pub fn skipped(channel: Channel, reason: impl Into<String>) -> Self {
        Self {
            channel,
            status: SendStatus::Skipped,
            recipient: None,
            error: Some(reason.into()),
            external_message_id: None,
            duration_ms: 0,
        }
    }

    pub fn for_recipient(mut self, recipient: Option<String>) -> Self {
        self.recipient = recipient;
        self
    }
}

/// 一次事件分发的汇总报告
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub dispatch_id: String,
    pub event_type: EventType,
    /// 没有任何失败
    pub success: bool,
    pub channel_results: Vec<ChannelResult>,
    pub duration_ms: u64,
    pub dispatched_at: DateTime<Utc>,
}

impl DispatchReport {
    pub fn new(event_type: EventType, channel_results: Vec<ChannelResult>, duration_ms: u64) -> Self {
        let success = channel_results
            .iter()
            .all(|r| r.status != SendStatus::Failed);
        Self {
            dispatch_id: Uuid::now_v7().to_string(),
            event_type,
            success,
            channel_results,
            duration_ms,
            dispatched_at: Utc::now(),
        }
    }

    fn count(&self, status: SendStatus) -> usize {
        self.channel_results
            .iter()
            .filter(|r| r.status == status)
            .count()
    }

    pub fn success_count(&self) -> usize {
        self.count(SendStatus::Success)
    }

    pub fn failure_count(&self) -> usize {
        self.count(SendStatus::Failed)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(SendStatus::Skipped)
    }

    /// 部分成功：有成功也有失败
    pub fn is_partial_success(&self) -> bool {
        self.success_count() > 0 && self.failure_count() > 0
    }

    pub fn results_for(&self, channel: Channel) -> impl Iterator<Item = &ChannelResult> {
        self.channel_results
            .iter()
            .filter(move |r| r.channel == channel)
    }
}

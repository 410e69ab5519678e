//! 渠道载荷
//!
//! 事件为每个渠道生成的独立载荷，彼此之间没有依赖。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 站内通知默认图标
pub const DEFAULT_APP_ICON: &str = "notifications";

/// 推送默认振动模式
pub const DEFAULT_VIBRATE: [u32; 3] = [100, 50, 100];

/// 站内通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppNotification {
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub icon: String,
    /// 站内跳转路径
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub is_read: bool,
    pub created_on: DateTime<Utc>,
}

impl InAppNotification {
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        created_on: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            body: body.into(),
            icon: DEFAULT_APP_ICON.to_string(),
            action: None,
            is_read: false,
            created_on,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// 已渲染的邮件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPayload {
    pub subject: String,
    pub html: String,
}

/// 推送通知上的操作按钮
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushAction {
    pub action: String,
    pub title: String,
}

/// 推送通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub vibrate: Vec<u32>,
    pub actions: Vec<PushAction>,
}

impl PushNotification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: "assets/icons/icon-96x96.png".to_string(),
            vibrate: DEFAULT_VIBRATE.to_vec(),
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: impl Into<String>, title: impl Into<String>) -> Self {
        self.actions.push(PushAction {
            action: action.into(),
            title: title.into(),
        });
        self
    }
}

/// 历史记录行，挂在出版物的审计时间线上
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryLine {
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub description: String,
}

impl HistoryLine {
    pub fn new(
        created_at: DateTime<Utc>,
        username: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            created_at,
            username: username.into(),
            description: description.into(),
        }
    }
}

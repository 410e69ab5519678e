//! 领域快照模型
//!
//! 事件在构造时持有的只读快照。调用方在触发业务动作的那一刻从存储中
//! 读取并复制这些数据，事件之后的渲染不会再访问存储，因此通知内容
//! 反映的是动作发生时的状态。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// 用户
// ---------------------------------------------------------------------------

/// 用户快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserSnapshot {
    /// 全名；姓名均为空时回退到昵称
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.nickname.clone()
        } else {
            name.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// 社区
// ---------------------------------------------------------------------------

/// 社区类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunityType {
    Community,
    Conference,
    Journal,
}

/// 订阅计划，只有付费社区允许自定义邮件模板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Premium,
}

/// 社区快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunitySnapshot {
    pub id: String,
    pub name: String,
    pub community_type: CommunityType,
    #[serde(default)]
    pub subscription: SubscriptionPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl CommunitySnapshot {
    pub fn is_premium(&self) -> bool {
        self.subscription == SubscriptionPlan::Premium
    }
}

// ---------------------------------------------------------------------------
// 出版物（Deposit）
// ---------------------------------------------------------------------------

/// 出版物作者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// 出版物快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositSnapshot {
    pub id: String,
    pub title: String,
    pub community_id: String,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

// ---------------------------------------------------------------------------
// 评审
// ---------------------------------------------------------------------------

/// 评审结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Accepted,
    MinorRevision,
    MajorRevision,
}

impl ReviewDecision {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::MinorRevision => "minor revision",
            Self::MajorRevision => "major revision",
        }
    }
}

/// 评审类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    #[default]
    PeerReview,
    CopyEditing,
}

/// 评审快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSnapshot {
    pub id: String,
    pub deposit_id: String,
    pub creator_id: String,
    #[serde(default)]
    pub kind: ReviewKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<ReviewDecision>,
}

// ---------------------------------------------------------------------------
// 评审邀请
// ---------------------------------------------------------------------------

/// 评审邀请快照
///
/// `addressee` 为受邀人的原始邮箱地址，受邀人可能尚未注册账号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSnapshot {
    pub id: String,
    pub addressee: String,
    pub deposit_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

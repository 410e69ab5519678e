//! 事件目录
//!
//! 定义封闭的事件类型枚举，以及每种事件的内部分类、邮件模板名和渠道集合。
//! 目录是事件与模板之间唯一的映射来源：每种事件最多对应一个规范模板名，
//! 反向查找失败意味着模板与目录不一致。

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Channel — 通知渠道
// ---------------------------------------------------------------------------

/// 通知渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    InApp,
    Email,
    Push,
    History,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Self::InApp, Self::Email, Self::Push, Self::History];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InApp => "IN_APP",
            Self::Email => "EMAIL",
            Self::Push => "PUSH",
            Self::History => "HISTORY",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 渠道集合（按位存储）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelSet(u8);

impl ChannelSet {
    pub const EMPTY: ChannelSet = ChannelSet(0);

    const fn bit(channel: Channel) -> u8 {
        match channel {
            Channel::InApp => 0b0001,
            Channel::Email => 0b0010,
            Channel::Push => 0b0100,
            Channel::History => 0b1000,
        }
    }

    pub const fn with(self, channel: Channel) -> Self {
        ChannelSet(self.0 | Self::bit(channel))
    }

    pub const fn contains(&self, channel: Channel) -> bool {
        self.0 & Self::bit(channel) != 0
    }

    pub fn insert(&mut self, channel: Channel) {
        self.0 |= Self::bit(channel);
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Channel> + '_ {
        Channel::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Channel> for ChannelSet {
    fn from_iter<I: IntoIterator<Item = Channel>>(iter: I) -> Self {
        let mut set = ChannelSet::EMPTY;
        for channel in iter {
            set.insert(channel);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// InternalType — 内部分类
// ---------------------------------------------------------------------------

/// 事件内部分类
///
/// `Community` 事件受社区成员的通知偏好约束；`System` 事件为平台级通知，始终投递。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InternalType {
    Community,
    System,
}

// ---------------------------------------------------------------------------
// EventType — 事件类型
// ---------------------------------------------------------------------------

/// 事件类型枚举
///
/// 每个值对应一次值得通知的业务状态迁移。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    // 社区生命周期
    CommunitySubmitted,
    CommunityAccepted,
    CommunityChangedToPendingApproval,

    // 出版物生命周期
    DepositSubmitted,
    DepositPublished,
    DepositChangedToDraft,
    DepositRejectedByModerator,

    // 评审生命周期
    ReviewSubmitted,
    ReviewPublished,
    ReviewChangedToPendingApproval,
    ReviewChangedToDraft,

    // 评审邀请
    ReviewInvitationCreated,
    ReviewInvitationAccepted,
    ReviewInvitationAcceptedConfirmation,
    ReviewInvitationRejected,

    // 平台邀请、聊天与通用通知
    Invite,
    ChatMessage,
    UnreadMessages,
    GeneralNotification,
    Test,
}

impl EventType {
    pub const ALL: [EventType; 20] = [
        Self::CommunitySubmitted,
        Self::CommunityAccepted,
        Self::CommunityChangedToPendingApproval,
        Self::DepositSubmitted,
        Self::DepositPublished,
        Self::DepositChangedToDraft,
        Self::DepositRejectedByModerator,
        Self::ReviewSubmitted,
        Self::ReviewPublished,
        Self::ReviewChangedToPendingApproval,
        Self::ReviewChangedToDraft,
        Self::ReviewInvitationCreated,
        Self::ReviewInvitationAccepted,
        Self::ReviewInvitationAcceptedConfirmation,
        Self::ReviewInvitationRejected,
        Self::Invite,
        Self::ChatMessage,
        Self::UnreadMessages,
        Self::GeneralNotification,
        Self::Test,
    ];

    /// 社区内容相关的事件受成员偏好约束，其余为平台级事件
    pub fn internal_type(&self) -> InternalType {
        match self {
            Self::DepositSubmitted
            | Self::DepositPublished
            | Self::DepositChangedToDraft
            | Self::DepositRejectedByModerator
            | Self::ReviewSubmitted
            | Self::ReviewPublished
            | Self::ReviewChangedToPendingApproval
            | Self::ReviewChangedToDraft
            | Self::ReviewInvitationCreated
            | Self::ReviewInvitationAccepted
            | Self::ReviewInvitationAcceptedConfirmation
            | Self::ReviewInvitationRejected
            | Self::GeneralNotification => InternalType::Community,
            Self::CommunitySubmitted
            | Self::CommunityAccepted
            | Self::CommunityChangedToPendingApproval
            | Self::Invite
            | Self::ChatMessage
            | Self::UnreadMessages
            | Self::Test => InternalType::System,
        }
    }

    /// 规范邮件模板名，不产生邮件的事件返回 None
    pub fn email_template_name(&self) -> Option<&'static str> {
        let name = match self {
            Self::CommunitySubmitted => "community-submitted",
            Self::CommunityAccepted => "community-accepted",
            Self::CommunityChangedToPendingApproval => "community-changed-to-pending-approval",
            Self::DepositSubmitted => "deposit-submitted",
            Self::DepositPublished => return None,
            Self::DepositChangedToDraft => "deposit-changed-to-draft",
            Self::DepositRejectedByModerator => "deposit-rejected",
            Self::ReviewSubmitted => "review-submitted-confirmation",
            Self::ReviewPublished => "review-published-confirmation",
            Self::ReviewChangedToPendingApproval => "review-changed-to-pending-approval",
            Self::ReviewChangedToDraft => "review-changed-to-draft",
            Self::ReviewInvitationCreated => "review-invitation",
            Self::ReviewInvitationAccepted => "review-invitation-accepted",
            Self::ReviewInvitationAcceptedConfirmation => "review-invitation-accepted-confirmation",
            Self::ReviewInvitationRejected => "review-invitation-rejected",
            Self::Invite => "invite",
            Self::ChatMessage => "chat-message",
            Self::UnreadMessages => "unread-messages",
            Self::GeneralNotification => "general-notification",
            Self::Test => return None,
        };
        Some(name)
    }

    /// 根据模板名反查事件类型
    pub fn from_template_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.email_template_name() == Some(name))
    }

    /// 社区管理员能否覆盖该事件的默认模板
    ///
    /// 只有发给社区作者和评审人的内容类邮件允许自定义
    pub fn is_customizable(&self) -> bool {
        self.internal_type() == InternalType::Community && self.email_template_name().is_some()
    }

    /// 该事件声明会产生的渠道集合
    pub fn channels(&self) -> ChannelSet {
        use Channel::*;
        let set = ChannelSet::EMPTY;
        match self {
            Self::CommunitySubmitted
            | Self::CommunityAccepted
            | Self::CommunityChangedToPendingApproval
            | Self::ReviewChangedToPendingApproval
            | Self::Invite
            | Self::UnreadMessages
            | Self::GeneralNotification => set.with(Email),
            Self::DepositPublished => set.with(InApp).with(History),
            Self::DepositSubmitted | Self::ReviewSubmitted | Self::ReviewInvitationCreated => {
                set.with(Email).with(History)
            }
            Self::DepositChangedToDraft
            | Self::DepositRejectedByModerator
            | Self::ReviewPublished
            | Self::ReviewInvitationRejected => set.with(InApp).with(Email).with(History),
            Self::ReviewChangedToDraft
            | Self::ReviewInvitationAccepted
            | Self::ReviewInvitationAcceptedConfirmation => {
                set.with(InApp).with(Email).with(Push).with(History)
            }
            Self::ChatMessage => set.with(Email).with(Push),
            Self::Test => set.with(Push),
        }
    }

    /// 与 serde 序列化一致的名称，便于日志与指标统一引用
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CommunitySubmitted => "COMMUNITY_SUBMITTED",
            Self::CommunityAccepted => "COMMUNITY_ACCEPTED",
            Self::CommunityChangedToPendingApproval => "COMMUNITY_CHANGED_TO_PENDING_APPROVAL",
            Self::DepositSubmitted => "DEPOSIT_SUBMITTED",
            Self::DepositPublished => "DEPOSIT_PUBLISHED",
            Self::DepositChangedToDraft => "DEPOSIT_CHANGED_TO_DRAFT",
            Self::DepositRejectedByModerator => "DEPOSIT_REJECTED_BY_MODERATOR",
            Self::ReviewSubmitted => "REVIEW_SUBMITTED",
            Self::ReviewPublished => "REVIEW_PUBLISHED",
            Self::ReviewChangedToPendingApproval => "REVIEW_CHANGED_TO_PENDING_APPROVAL",
            Self::ReviewChangedToDraft => "REVIEW_CHANGED_TO_DRAFT",
            Self::ReviewInvitationCreated => "REVIEW_INVITATION_CREATED",
            Self::ReviewInvitationAccepted => "REVIEW_INVITATION_ACCEPTED",
            Self::ReviewInvitationAcceptedConfirmation => {
                "REVIEW_INVITATION_ACCEPTED_CONFIRMATION"
            }
            Self::ReviewInvitationRejected => "REVIEW_INVITATION_REJECTED",
            Self::Invite => "INVITE",
            Self::ChatMessage => "CHAT_MESSAGE",
            Self::UnreadMessages => "UNREAD_MESSAGES",
            Self::GeneralNotification => "GENERAL_NOTIFICATION",
            Self::Test => "TEST",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

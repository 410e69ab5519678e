//! 载荷包
//!
//! 调用方按事件类型名和一组快照触发通知时使用。缺少必需快照时立即失败，
//! 不会产生部分通知。

use orvium_shared::models::{
    CommunitySnapshot, DepositSnapshot, InvitationSnapshot, ReviewSnapshot, UserSnapshot,
};
use serde::{Deserialize, Serialize};

use super::*;
use crate::error::NotificationError;
use crate::links::EventContext;

/// 松散类型的快照集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayloadBundle {
    /// 事件的主体用户（作者、评审人、创建者）
    pub user: Option<UserSnapshot>,
    pub community: Option<CommunitySnapshot>,
    pub deposit: Option<DepositSnapshot>,
    pub review: Option<ReviewSnapshot>,
    pub invitation: Option<InvitationSnapshot>,
    /// 发起者（编辑、消息发送者）
    pub sender: Option<UserSnapshot>,
    /// 受邀评审人，可能没有账号
    pub reviewer: Option<UserSnapshot>,
    pub reason: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub addressee: Option<String>,
    pub conversation_id: Option<String>,
    pub unread_count: Option<u32>,
}

fn require<T>(value: Option<T>, event_type: EventType, entity: &'static str) -> Result<T> {
    value.ok_or_else(|| NotificationError::MissingSnapshot {
        event_type: event_type.to_string(),
        entity,
    })
}

impl PayloadBundle {
    fn review_snapshots(&mut self, event_type: EventType) -> Result<ReviewSnapshots> {
        Ok(ReviewSnapshots::new(
            require(self.review.take(), event_type, "review")?,
            require(self.deposit.take(), event_type, "deposit")?,
            require(self.community.take(), event_type, "community")?,
            require(self.user.take(), event_type, "user")?,
        ))
    }

    fn invitation_parties(&mut self, event_type: EventType) -> Result<InvitationParties> {
        Ok(InvitationParties::new(
            require(self.invitation.take(), event_type, "invitation")?,
            require(self.deposit.take(), event_type, "deposit")?,
            require(self.community.take(), event_type, "community")?,
            require(self.sender.take(), event_type, "sender")?,
            self.reviewer.take(),
        ))
    }
}

impl AppEvent {
    /// 根据事件类型和载荷包构造事件
    pub fn from_bundle(
        event_type: EventType,
        mut bundle: PayloadBundle,
        ctx: EventContext,
    ) -> Result<Self> {
        let t = event_type;
        let event = match event_type {
            EventType::CommunitySubmitted => CommunitySubmittedEvent::new(
                require(bundle.community, t, "community")?,
                require(bundle.user, t, "user")?,
                ctx,
            )
            .into(),
            EventType::CommunityAccepted => CommunityAcceptedEvent::new(
                require(bundle.community, t, "community")?,
                require(bundle.user, t, "user")?,
                ctx,
            )
            .into(),
            EventType::CommunityChangedToPendingApproval => {
                CommunityChangedToPendingApprovalEvent::new(
                    require(bundle.community, t, "community")?,
                    require(bundle.user, t, "user")?,
                    ctx,
                )
                .into()
            }
            EventType::DepositSubmitted => DepositSubmittedEvent::new(
                require(bundle.deposit, t, "deposit")?,
                require(bundle.community, t, "community")?,
                require(bundle.user, t, "user")?,
                ctx,
            )
            .into(),
            EventType::DepositPublished => DepositPublishedEvent::new(
                require(bundle.deposit, t, "deposit")?,
                require(bundle.community, t, "community")?,
                require(bundle.user, t, "user")?,
                ctx,
            )
            .into(),
            EventType::DepositChangedToDraft => DepositChangedToDraftEvent::new(
                require(bundle.deposit, t, "deposit")?,
                require(bundle.community, t, "community")?,
                require(bundle.user, t, "user")?,
                bundle.reason,
                ctx,
            )
            .into(),
            EventType::DepositRejectedByModerator => DepositRejectedByModeratorEvent::new(
                require(bundle.deposit, t, "deposit")?,
                require(bundle.community, t, "community")?,
                require(bundle.user, t, "user")?,
                bundle.reason,
                ctx,
            )
            .into(),
            EventType::ReviewSubmitted => {
                ReviewSubmittedEvent::new(bundle.review_snapshots(t)?, ctx).into()
            }
            EventType::ReviewPublished => {
                ReviewPublishedEvent::new(bundle.review_snapshots(t)?, ctx).into()
            }
            EventType::ReviewChangedToPendingApproval => {
                ReviewChangedToPendingApprovalEvent::new(bundle.review_snapshots(t)?, ctx).into()
            }
            EventType::ReviewChangedToDraft => {
                let snapshots = bundle.review_snapshots(t)?;
                ReviewChangedToDraftEvent::new(snapshots, bundle.reason, ctx).into()
            }
            EventType::ReviewInvitationCreated => {
                ReviewInvitationCreatedEvent::new(bundle.invitation_parties(t)?, ctx).into()
            }
            EventType::ReviewInvitationAccepted => {
                ReviewInvitationAcceptedEvent::new(bundle.invitation_parties(t)?, ctx).into()
            }
            EventType::ReviewInvitationAcceptedConfirmation => {
                ReviewInvitationAcceptedConfirmationEvent::new(bundle.invitation_parties(t)?, ctx)
                    .into()
            }
            EventType::ReviewInvitationRejected => {
                let parties = bundle.invitation_parties(t)?;
                ReviewInvitationRejectedEvent::new(parties, bundle.reason, ctx).into()
            }
            EventType::Invite => InviteEvent::new(
                require(bundle.sender, t, "sender")?,
                require(bundle.addressee, t, "addressee")?,
                bundle.community,
                ctx,
            )
            .into(),
            EventType::ChatMessage => ChatMessageEvent::new(
                require(bundle.sender, t, "sender")?,
                require(bundle.conversation_id, t, "conversation")?,
                ctx,
            )
            .into(),
            EventType::UnreadMessages => UnreadMessagesEvent::new(
                require(bundle.user, t, "user")?,
                require(bundle.unread_count, t, "unread count")?,
                ctx,
            )
            .into(),
            EventType::GeneralNotification => GeneralNotificationEvent::new(
                bundle.community,
                require(bundle.subject, t, "subject")?,
                require(bundle.message, t, "message")?,
                ctx,
            )
            .into(),
            EventType::Test => TestEvent::new(ctx).into(),
        };
        Ok(event)
    }
}

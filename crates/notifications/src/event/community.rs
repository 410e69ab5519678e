//! 社区生命周期事件

use orvium_shared::models::{CommunitySnapshot, UserSnapshot};

use super::{EmailContent, NotificationEvent};
use crate::catalog::EventType;
use crate::links::EventContext;
use crate::template::variables::{
    EmailVariableSet, convert_to_email_community, convert_to_email_user,
};

fn community_variables(
    ctx: &EventContext,
    community: &CommunitySnapshot,
    user: &UserSnapshot,
) -> EmailVariableSet {
    EmailVariableSet::base(&ctx.links)
        .merge(convert_to_email_user(user))
        .merge(convert_to_email_community(community, &ctx.links))
}

/// 新社区提交审核，通知平台管理员
#[derive(Debug, Clone)]
pub struct CommunitySubmittedEvent {
    pub community: CommunitySnapshot,
    pub user: UserSnapshot,
    pub ctx: EventContext,
}

impl CommunitySubmittedEvent {
    pub fn new(community: CommunitySnapshot, user: UserSnapshot, ctx: EventContext) -> Self {
        Self {
            community,
            user,
            ctx,
        }
    }
}

impl NotificationEvent for CommunitySubmittedEvent {
    fn event_type(&self) -> EventType {
        EventType::CommunitySubmitted
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.community)
    }

    fn email_content(&self) -> Option<EmailContent> {
        Some(EmailContent::new(
            format!("New community submitted: {}", self.community.name),
            community_variables(&self.ctx, &self.community, &self.user),
        ))
    }
}

/// 社区审核通过，通知创建者
#[derive(Debug, Clone)]
pub struct CommunityAcceptedEvent {
    pub community: CommunitySnapshot,
    pub user: UserSnapshot,
    pub ctx: EventContext,
}

impl CommunityAcceptedEvent {
    pub fn new(community: CommunitySnapshot, user: UserSnapshot, ctx: EventContext) -> Self {
        Self {
            community,
            user,
            ctx,
        }
    }
}

impl NotificationEvent for CommunityAcceptedEvent {
    fn event_type(&self) -> EventType {
        EventType::CommunityAccepted
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.community)
    }

    fn email_content(&self) -> Option<EmailContent> {
        Some(EmailContent::new(
            format!("Your community {} has been accepted", self.community.name),
            community_variables(&self.ctx, &self.community, &self.user),
        ))
    }
}

/// 社区进入待审核状态
#[derive(Debug, Clone)]
pub struct CommunityChangedToPendingApprovalEvent {
    pub community: CommunitySnapshot,
    pub user: UserSnapshot,
    pub ctx: EventContext,
}

impl CommunityChangedToPendingApprovalEvent {
    pub fn new(community: CommunitySnapshot, user: UserSnapshot, ctx: EventContext) -> Self {
        Self {
            community,
            user,
            ctx,
        }
    }
}

impl NotificationEvent for CommunityChangedToPendingApprovalEvent {
    fn event_type(&self) -> EventType {
        EventType::CommunityChangedToPendingApproval
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.community)
    }

    fn email_content(&self) -> Option<EmailContent> {
        Some(EmailContent::new(
            format!("Community {} is pending approval", self.community.name),
            community_variables(&self.ctx, &self.community, &self.user),
        ))
    }
}

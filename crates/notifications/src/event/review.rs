//! 评审生命周期事件

use orvium_shared::models::{CommunitySnapshot, DepositSnapshot, ReviewSnapshot, UserSnapshot};

use super::{EmailContent, NotificationEvent};
use crate::catalog::EventType;
use crate::links::{EventContext, SiteLinks};
use crate::payload::{HistoryLine, InAppNotification, PushNotification};
use crate::template::variables::{
    EmailVariableSet, convert_to_email_community, convert_to_email_publication,
    convert_to_email_review, convert_to_email_user,
};

/// 评审事件共用的快照
#[derive(Debug, Clone)]
pub struct ReviewSnapshots {
    pub review: ReviewSnapshot,
    pub deposit: DepositSnapshot,
    pub community: CommunitySnapshot,
    /// 评审人
    pub user: UserSnapshot,
}

impl ReviewSnapshots {
    pub fn new(
        review: ReviewSnapshot,
        deposit: DepositSnapshot,
        community: CommunitySnapshot,
        user: UserSnapshot,
    ) -> Self {
        Self {
            review,
            deposit,
            community,
            user,
        }
    }

    fn variables(&self, ctx: &EventContext) -> EmailVariableSet {
        EmailVariableSet::base(&ctx.links)
            .merge(convert_to_email_user(&self.user))
            .merge(convert_to_email_community(&self.community, &ctx.links))
            .merge(convert_to_email_publication(&self.deposit, &ctx.links))
            .merge(convert_to_email_review(&self.review, &ctx.links))
    }
}

#[derive(Debug, Clone)]
pub struct ReviewSubmittedEvent {
    pub snapshots: ReviewSnapshots,
    pub ctx: EventContext,
}

impl ReviewSubmittedEvent {
    pub fn new(snapshots: ReviewSnapshots, ctx: EventContext) -> Self {
        Self { snapshots, ctx }
    }
}

impl NotificationEvent for ReviewSubmittedEvent {
    fn event_type(&self) -> EventType {
        EventType::ReviewSubmitted
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.snapshots.community)
    }

    fn email_content(&self) -> Option<EmailContent> {
        Some(EmailContent::new(
            format!(
                "Your review of {} has been submitted",
                self.snapshots.deposit.title
            ),
            self.snapshots.variables(&self.ctx),
        ))
    }

    fn history(&self) -> Option<HistoryLine> {
        Some(HistoryLine::new(
            self.ctx.occurred_at,
            self.snapshots.user.full_name(),
            "Review submitted.",
        ))
    }
}

#[derive(Debug, Clone)]
pub struct ReviewPublishedEvent {
    pub snapshots: ReviewSnapshots,
    pub ctx: EventContext,
}

impl ReviewPublishedEvent {
    pub fn new(snapshots: ReviewSnapshots, ctx: EventContext) -> Self {
        Self { snapshots, ctx }
    }
}

impl NotificationEvent for ReviewPublishedEvent {
    fn event_type(&self) -> EventType {
        EventType::ReviewPublished
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.snapshots.community)
    }

    fn app_notification(&self, user_id: Option<&str>) -> Option<InAppNotification> {
        let s = &self.snapshots;
        Some(
            InAppNotification::new(
                user_id.unwrap_or(&s.user.id),
                "Review published",
                format!("Your review of \"{}\" has been published.", s.deposit.title),
                self.ctx.occurred_at,
            )
            .with_icon("rate_review")
            .with_action(SiteLinks::review_path(&s.review.id)),
        )
    }

    fn email_content(&self) -> Option<EmailContent> {
        Some(EmailContent::new(
            format!(
                "Your review of {} has been published",
                self.snapshots.deposit.title
            ),
            self.snapshots.variables(&self.ctx),
        ))
    }

    fn history(&self) -> Option<HistoryLine> {
        Some(HistoryLine::new(
            self.ctx.occurred_at,
            self.snapshots.user.full_name(),
            format!("Review published in {}.", self.snapshots.community.name),
        ))
    }
}

/// 评审进入待审核状态，通知版主
#[derive(Debug, Clone)]
pub struct ReviewChangedToPendingApprovalEvent {
    pub snapshots: ReviewSnapshots,
    pub ctx: EventContext,
}

impl ReviewChangedToPendingApprovalEvent {
    pub fn new(snapshots: ReviewSnapshots, ctx: EventContext) -> Self {
        Self { snapshots, ctx }
    }
}

impl NotificationEvent for ReviewChangedToPendingApprovalEvent {
    fn event_type(&self) -> EventType {
        EventType::ReviewChangedToPendingApproval
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.snapshots.community)
    }

    fn email_content(&self) -> Option<EmailContent> {
        Some(EmailContent::new(
            format!(
                "New review pending approval for {}",
                self.snapshots.deposit.title
            ),
            self.snapshots.variables(&self.ctx),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct ReviewChangedToDraftEvent {
    pub snapshots: ReviewSnapshots,
    pub reason: Option<String>,
    pub ctx: EventContext,
}

impl ReviewChangedToDraftEvent {
    pub fn new(snapshots: ReviewSnapshots, reason: Option<String>, ctx: EventContext) -> Self {
        Self {
            snapshots,
            reason,
            ctx,
        }
    }
}

impl NotificationEvent for ReviewChangedToDraftEvent {
    fn event_type(&self) -> EventType {
        EventType::ReviewChangedToDraft
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.snapshots.community)
    }

    fn app_notification(&self, user_id: Option<&str>) -> Option<InAppNotification> {
        let s = &self.snapshots;
        Some(
            InAppNotification::new(
                user_id.unwrap_or(&s.user.id),
                "Review changed to draft",
                format!(
                    "Your review of \"{}\" has been changed to draft.",
                    s.deposit.title
                ),
                self.ctx.occurred_at,
            )
            .with_icon("edit_note")
            .with_action(SiteLinks::review_path(&s.review.id)),
        )
    }

    fn email_content(&self) -> Option<EmailContent> {
        let mut variables = self.snapshots.variables(&self.ctx);
        variables.insert_opt("MODERATOR_MESSAGE", self.reason.as_deref());
        Some(EmailContent::new(
            format!(
                "Your review of {} has been changed to draft",
                self.snapshots.deposit.title
            ),
            variables,
        ))
    }

    fn push_notification(&self) -> Option<PushNotification> {
        Some(
            PushNotification::new(
                "Review changed to draft",
                format!(
                    "Your review of \"{}\" needs changes.",
                    self.snapshots.deposit.title
                ),
            )
            .with_action("open", "Open review"),
        )
    }

    fn history(&self) -> Option<HistoryLine> {
        Some(HistoryLine::new(
            self.ctx.occurred_at,
            self.snapshots.user.full_name(),
            "Review changed to draft.",
        ))
    }
}

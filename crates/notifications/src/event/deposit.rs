//! 出版物生命周期事件

use orvium_shared::models::{CommunitySnapshot, DepositSnapshot, UserSnapshot};

use super::{EmailContent, NotificationEvent};
use crate::catalog::EventType;
use crate::links::{EventContext, SiteLinks};
use crate::payload::{HistoryLine, InAppNotification};
use crate::template::variables::{
    EmailVariableSet, convert_to_email_community, convert_to_email_publication,
    convert_to_email_user,
};

fn deposit_variables(
    ctx: &EventContext,
    deposit: &DepositSnapshot,
    community: &CommunitySnapshot,
    user: &UserSnapshot,
) -> EmailVariableSet {
    EmailVariableSet::base(&ctx.links)
        .merge(convert_to_email_user(user))
        .merge(convert_to_email_community(community, &ctx.links))
        .merge(convert_to_email_publication(deposit, &ctx.links))
}

// ---------------------------------------------------------------------------
// 提交
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DepositSubmittedEvent {
    pub deposit: DepositSnapshot,
    pub community: CommunitySnapshot,
    pub user: UserSnapshot,
    pub ctx: EventContext,
}

impl DepositSubmittedEvent {
    pub fn new(
        deposit: DepositSnapshot,
        community: CommunitySnapshot,
        user: UserSnapshot,
        ctx: EventContext,
    ) -> Self {
        Self {
            deposit,
            community,
            user,
            ctx,
        }
    }
}

impl NotificationEvent for DepositSubmittedEvent {
    fn event_type(&self) -> EventType {
        EventType::DepositSubmitted
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.community)
    }

    fn email_content(&self) -> Option<EmailContent> {
        Some(EmailContent::new(
            format!("Publication submitted to {}", self.community.name),
            deposit_variables(&self.ctx, &self.deposit, &self.community, &self.user),
        ))
    }

    fn history(&self) -> Option<HistoryLine> {
        Some(HistoryLine::new(
            self.ctx.occurred_at,
            self.user.full_name(),
            format!("Publication submitted to {}.", self.community.name),
        ))
    }
}

// ---------------------------------------------------------------------------
// 发布
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DepositPublishedEvent {
    pub deposit: DepositSnapshot,
    pub community: CommunitySnapshot,
    pub user: UserSnapshot,
    pub ctx: EventContext,
}

impl DepositPublishedEvent {
    pub fn new(
        deposit: DepositSnapshot,
        community: CommunitySnapshot,
        user: UserSnapshot,
        ctx: EventContext,
    ) -> Self {
        Self {
            deposit,
            community,
            user,
            ctx,
        }
    }
}

impl NotificationEvent for DepositPublishedEvent {
    fn event_type(&self) -> EventType {
        EventType::DepositPublished
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.community)
    }

    fn app_notification(&self, user_id: Option<&str>) -> Option<InAppNotification> {
        Some(
            InAppNotification::new(
                user_id.unwrap_or(&self.user.id),
                "Publication published",
                format!(
                    "Your publication \"{}\" has been published in {}.",
                    self.deposit.title, self.community.name
                ),
                self.ctx.occurred_at,
            )
            .with_icon("publish")
            .with_action(SiteLinks::deposit_path(&self.deposit.id)),
        )
    }

    fn history(&self) -> Option<HistoryLine> {
        Some(HistoryLine::new(
            self.ctx.occurred_at,
            self.user.full_name(),
            format!("Publication published in {}.", self.community.name),
        ))
    }
}

// ---------------------------------------------------------------------------
// 退回草稿 / 驳回
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DepositChangedToDraftEvent {
    pub deposit: DepositSnapshot,
    pub community: CommunitySnapshot,
    pub user: UserSnapshot,
    /// 版主留言
    pub reason: Option<String>,
    pub ctx: EventContext,
}

impl DepositChangedToDraftEvent {
    pub fn new(
        deposit: DepositSnapshot,
        community: CommunitySnapshot,
        user: UserSnapshot,
        reason: Option<String>,
        ctx: EventContext,
    ) -> Self {
        Self {
            deposit,
            community,
            user,
            reason,
            ctx,
        }
    }
}

impl NotificationEvent for DepositChangedToDraftEvent {
    fn event_type(&self) -> EventType {
        EventType::DepositChangedToDraft
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.community)
    }

    fn app_notification(&self, user_id: Option<&str>) -> Option<InAppNotification> {
        Some(
            InAppNotification::new(
                user_id.unwrap_or(&self.user.id),
                "Publication changed to draft",
                format!(
                    "Your publication \"{}\" has been changed to draft by the moderators of {}.",
                    self.deposit.title, self.community.name
                ),
                self.ctx.occurred_at,
            )
            .with_icon("edit_note")
            .with_action(SiteLinks::deposit_path(&self.deposit.id)),
        )
    }

    fn email_content(&self) -> Option<EmailContent> {
        let mut variables =
            deposit_variables(&self.ctx, &self.deposit, &self.community, &self.user);
        variables.insert_opt("MODERATOR_MESSAGE", self.reason.as_deref());
        Some(EmailContent::new(
            format!("Your publication {} has been changed to draft", self.deposit.title),
            variables,
        ))
    }

    fn history(&self) -> Option<HistoryLine> {
        Some(HistoryLine::new(
            self.ctx.occurred_at,
            self.user.full_name(),
            "Publication changed to draft.",
        ))
    }
}

#[derive(Debug, Clone)]
pub struct DepositRejectedByModeratorEvent {
    pub deposit: DepositSnapshot,
    pub community: CommunitySnapshot,
    pub user: UserSnapshot,
    pub reason: Option<String>,
    pub ctx: EventContext,
}

impl DepositRejectedByModeratorEvent {
    pub fn new(
        deposit: DepositSnapshot,
        community: CommunitySnapshot,
        user: UserSnapshot,
        reason: Option<String>,
        ctx: EventContext,
    ) -> Self {
        Self {
            deposit,
            community,
            user,
            reason,
            ctx,
        }
    }
}

impl NotificationEvent for DepositRejectedByModeratorEvent {
    fn event_type(&self) -> EventType {
        EventType::DepositRejectedByModerator
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.community)
    }

    fn app_notification(&self, user_id: Option<&str>) -> Option<InAppNotification> {
        Some(
            InAppNotification::new(
                user_id.unwrap_or(&self.user.id),
                "Publication rejected",
                format!(
                    "Your publication \"{}\" has been rejected by the moderators of {}.",
                    self.deposit.title, self.community.name
                ),
                self.ctx.occurred_at,
            )
            .with_icon("block")
            .with_action(SiteLinks::deposit_path(&self.deposit.id)),
        )
    }

    fn email_content(&self) -> Option<EmailContent> {
        let mut variables =
            deposit_variables(&self.ctx, &self.deposit, &self.community, &self.user);
        variables.insert_opt("MODERATOR_MESSAGE", self.reason.as_deref());
        Some(EmailContent::new(
            format!("Your publication {} has been rejected", self.deposit.title),
            variables,
        ))
    }

    fn history(&self) -> Option<HistoryLine> {
        Some(HistoryLine::new(
            self.ctx.occurred_at,
            self.user.full_name(),
            format!("Publication rejected by the moderators of {}.", self.community.name),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::renderer::TemplateRenderer;
    use chrono::{TimeZone, Utc};
    use orvium_shared::models::SubscriptionPlan;
    use orvium_shared::test_utils::{test_community, test_deposit, test_user};

    fn ctx() -> EventContext {
        EventContext::at(
            SiteLinks::default(),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_deposit_published_payloads() {
        let community = test_community("Orvium Journal", SubscriptionPlan::Free);
        let deposit = test_deposit("Origin of the Species", &community);
        let user = test_user("John", "Doe");
        let event = DepositPublishedEvent::new(deposit.clone(), community, user.clone(), ctx());

        let app = event.app_notification(None).unwrap();
        assert!(app.body.contains("Origin of the Species"));
        assert_eq!(app.user_id, user.id);
        assert_eq!(
            app.action.as_deref(),
            Some(format!("/deposits/{}/view", deposit.id).as_str())
        );
        assert!(!app.is_read);

        let history = event.history().unwrap();
        assert_eq!(history.description, "Publication published in Orvium Journal.");
        assert_eq!(history.username, "John Doe");
        assert_eq!(history.created_at, ctx().occurred_at);

        assert!(event.email_content().is_none());
        assert!(
            event
                .email(&TemplateRenderer::strict(), "{{anything}}")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_app_notification_uses_given_user() {
        let community = test_community("C", SubscriptionPlan::Free);
        let deposit = test_deposit("T", &community);
        let event = DepositPublishedEvent::new(deposit, community, test_user("A", "B"), ctx());
        assert_eq!(event.app_notification(Some("other")).unwrap().user_id, "other");
    }

    #[test]
    fn test_moderator_message_is_optional() {
        let community = test_community("C", SubscriptionPlan::Free);
        let deposit = test_deposit("T", &community);
        let user = test_user("A", "B");

        let with_reason = DepositChangedToDraftEvent::new(
            deposit.clone(),
            community.clone(),
            user.clone(),
            Some("Please fix the abstract".to_string()),
            ctx(),
        );
        let content = with_reason.email_content().unwrap();
        assert_eq!(
            content.variables.get("MODERATOR_MESSAGE"),
            Some("Please fix the abstract")
        );

        let without =
            DepositRejectedByModeratorEvent::new(deposit, community, user, None, ctx());
        assert!(
            !without
                .email_content()
                .unwrap()
                .variables
                .contains_key("MODERATOR_MESSAGE")
        );
    }
}

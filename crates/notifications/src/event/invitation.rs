//! 评审邀请事件
//!
//! 受邀人可能还没有平台账号，此时所有展示评审人的地方都回退到邀请邮箱。

use orvium_shared::models::{CommunitySnapshot, DepositSnapshot, InvitationSnapshot, UserSnapshot};

use super::{EmailContent, NotificationEvent};
use crate::catalog::EventType;
use crate::links::{EventContext, SiteLinks};
use crate::payload::{HistoryLine, InAppNotification, PushNotification};
use crate::template::variables::{
    EmailVariableSet, convert_to_email_community, convert_to_email_invitation,
    convert_to_email_publication, convert_to_email_user,
};

/// 邀请相关的各方快照
#[derive(Debug, Clone)]
pub struct InvitationParties {
    pub invitation: InvitationSnapshot,
    pub deposit: DepositSnapshot,
    pub community: CommunitySnapshot,
    /// 发出邀请的编辑
    pub sender: UserSnapshot,
    /// 受邀评审人，未注册时为 None
    pub reviewer: Option<UserSnapshot>,
    reviewer_fullname_or_email: String,
}

impl InvitationParties {
    pub fn new(
        invitation: InvitationSnapshot,
        deposit: DepositSnapshot,
        community: CommunitySnapshot,
        sender: UserSnapshot,
        reviewer: Option<UserSnapshot>,
    ) -> Self {
        let reviewer_fullname_or_email = reviewer
            .as_ref()
            .map(|r| r.full_name())
            .unwrap_or_else(|| invitation.addressee.clone());
        Self {
            invitation,
            deposit,
            community,
            sender,
            reviewer,
            reviewer_fullname_or_email,
        }
    }

    /// 评审人全名，无账号时为邀请邮箱
    pub fn reviewer_fullname_or_email(&self) -> &str {
        &self.reviewer_fullname_or_email
    }

    /// 评审人账号 ID，无账号时为邀请邮箱
    fn reviewer_id_or_addressee(&self) -> &str {
        self.reviewer
            .as_ref()
            .map(|r| r.id.as_str())
            .unwrap_or(&self.invitation.addressee)
    }

    fn variables(&self, ctx: &EventContext) -> EmailVariableSet {
        let mut variables = EmailVariableSet::base(&ctx.links)
            .merge(convert_to_email_community(&self.community, &ctx.links))
            .merge(convert_to_email_publication(&self.deposit, &ctx.links))
            .merge(convert_to_email_invitation(&self.invitation, &ctx.links));
        if let Some(reviewer) = &self.reviewer {
            variables = variables.merge(convert_to_email_user(reviewer));
        }
        variables
            .with("SENDER_FULLNAME", self.sender.full_name())
            .with("REVIEWER_FULLNAME_OR_EMAIL", &self.reviewer_fullname_or_email)
    }
}

// ---------------------------------------------------------------------------
// 创建邀请
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReviewInvitationCreatedEvent {
    pub parties: InvitationParties,
    pub ctx: EventContext,
}

impl ReviewInvitationCreatedEvent {
    pub fn new(parties: InvitationParties, ctx: EventContext) -> Self {
        Self { parties, ctx }
    }
}

impl NotificationEvent for ReviewInvitationCreatedEvent {
    fn event_type(&self) -> EventType {
        EventType::ReviewInvitationCreated
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.parties.community)
    }

    fn email_content(&self) -> Option<EmailContent> {
        Some(EmailContent::new(
            format!(
                "Invitation to review {} in {}",
                self.parties.deposit.title, self.parties.community.name
            ),
            self.parties.variables(&self.ctx),
        ))
    }

    fn history(&self) -> Option<HistoryLine> {
        Some(HistoryLine::new(
            self.ctx.occurred_at,
            self.parties.sender.full_name(),
            format!(
                "Review invitation sent to {}.",
                self.parties.reviewer_fullname_or_email()
            ),
        ))
    }
}

// ---------------------------------------------------------------------------
// 接受邀请（通知编辑）
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReviewInvitationAcceptedEvent {
    pub parties: InvitationParties,
    pub ctx: EventContext,
}

impl ReviewInvitationAcceptedEvent {
    pub fn new(parties: InvitationParties, ctx: EventContext) -> Self {
        Self { parties, ctx }
    }
}

impl NotificationEvent for ReviewInvitationAcceptedEvent {
    fn event_type(&self) -> EventType {
        EventType::ReviewInvitationAccepted
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.parties.community)
    }

    fn app_notification(&self, user_id: Option<&str>) -> Option<InAppNotification> {
        let p = &self.parties;
        Some(
            InAppNotification::new(
                user_id.unwrap_or(&p.sender.id),
                format!("{} accepted your invitation", p.reviewer_fullname_or_email()),
                format!(
                    "{} accepted the invitation to review \"{}\".",
                    p.reviewer_fullname_or_email(),
                    p.deposit.title
                ),
                self.ctx.occurred_at,
            )
            .with_icon("how_to_reg")
            .with_action(SiteLinks::deposit_path(&p.deposit.id)),
        )
    }

    fn email_content(&self) -> Option<EmailContent> {
        Some(EmailContent::new(
            format!(
                "{} accepted to review {}",
                self.parties.reviewer_fullname_or_email(),
                self.parties.deposit.title
            ),
            self.parties.variables(&self.ctx),
        ))
    }

    fn push_notification(&self) -> Option<PushNotification> {
        Some(
            PushNotification::new(
                "Review invitation accepted",
                format!(
                    "{} accepted the invitation to review \"{}\".",
                    self.parties.reviewer_fullname_or_email(),
                    self.parties.deposit.title
                ),
            )
            .with_action("open", "Open publication"),
        )
    }

    fn history(&self) -> Option<HistoryLine> {
        Some(HistoryLine::new(
            self.ctx.occurred_at,
            self.parties.reviewer_fullname_or_email(),
            format!(
                "Review invitation accepted by {}.",
                self.parties.reviewer_fullname_or_email()
            ),
        ))
    }
}

// ---------------------------------------------------------------------------
// 接受邀请确认（通知评审人）
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReviewInvitationAcceptedConfirmationEvent {
    pub parties: InvitationParties,
    pub ctx: EventContext,
}

impl ReviewInvitationAcceptedConfirmationEvent {
    pub fn new(parties: InvitationParties, ctx: EventContext) -> Self {
        Self { parties, ctx }
    }
}

impl NotificationEvent for ReviewInvitationAcceptedConfirmationEvent {
    fn event_type(&self) -> EventType {
        EventType::ReviewInvitationAcceptedConfirmation
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.parties.community)
    }

    fn app_notification(&self, user_id: Option<&str>) -> Option<InAppNotification> {
        let p = &self.parties;
        let user_id = user_id.unwrap_or_else(|| p.reviewer_id_or_addressee());
        Some(
            InAppNotification::new(
                user_id,
                "Review invitation accepted",
                format!(
                    "{}, thank you for accepting to review \"{}\".",
                    p.reviewer_fullname_or_email(),
                    p.deposit.title
                ),
                self.ctx.occurred_at,
            )
            .with_icon("how_to_reg")
            .with_action(SiteLinks::deposit_path(&p.deposit.id)),
        )
    }

    fn email_content(&self) -> Option<EmailContent> {
        Some(EmailContent::new(
            format!(
                "You accepted to review {}",
                self.parties.deposit.title
            ),
            self.parties.variables(&self.ctx),
        ))
    }

    fn push_notification(&self) -> Option<PushNotification> {
        Some(
            PushNotification::new(
                "Review invitation accepted",
                format!(
                    "{}, you can now start reviewing \"{}\".",
                    self.parties.reviewer_fullname_or_email(),
                    self.parties.deposit.title
                ),
            )
            .with_action("open", "Start review"),
        )
    }

    fn history(&self) -> Option<HistoryLine> {
        Some(HistoryLine::new(
            self.ctx.occurred_at,
            self.parties.reviewer_fullname_or_email(),
            format!(
                "{} confirmed the review invitation.",
                self.parties.reviewer_fullname_or_email()
            ),
        ))
    }
}

// ---------------------------------------------------------------------------
// 拒绝邀请
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReviewInvitationRejectedEvent {
    pub parties: InvitationParties,
    pub reason: Option<String>,
    pub ctx: EventContext,
}

impl ReviewInvitationRejectedEvent {
    pub fn new(parties: InvitationParties, reason: Option<String>, ctx: EventContext) -> Self {
        Self {
            parties,
            reason,
            ctx,
        }
    }
}

impl NotificationEvent for ReviewInvitationRejectedEvent {
    fn event_type(&self) -> EventType {
        EventType::ReviewInvitationRejected
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        Some(&self.parties.community)
    }

    fn app_notification(&self, user_id: Option<&str>) -> Option<InAppNotification> {
        let p = &self.parties;
        let mut body = format!(
            "{} declined the invitation to review \"{}\".",
            p.reviewer_fullname_or_email(),
            p.deposit.title
        );
        if let Some(reason) = &self.reason {
            body.push_str(&format!(" Reason: {reason}"));
        }
        Some(
            InAppNotification::new(
                user_id.unwrap_or(&p.sender.id),
                "Review invitation declined",
                body,
                self.ctx.occurred_at,
            )
            .with_icon("person_remove")
            .with_action(SiteLinks::deposit_path(&p.deposit.id)),
        )
    }

    fn email_content(&self) -> Option<EmailContent> {
        let mut variables = self.parties.variables(&self.ctx);
        variables.insert_opt("REJECTION_REASON", self.reason.as_deref());
        Some(EmailContent::new(
            format!(
                "{} declined to review {}",
                self.parties.reviewer_fullname_or_email(),
                self.parties.deposit.title
            ),
            variables,
        ))
    }

    fn history(&self) -> Option<HistoryLine> {
        Some(HistoryLine::new(
            self.ctx.occurred_at,
            self.parties.reviewer_fullname_or_email(),
            format!(
                "Review invitation declined by {}.",
                self.parties.reviewer_fullname_or_email()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orvium_shared::models::SubscriptionPlan;
    use orvium_shared::test_utils::{test_community, test_deposit, test_invitation, test_user};

    fn parties(reviewer: Option<UserSnapshot>) -> InvitationParties {
        let community = test_community("Orvium Journal", SubscriptionPlan::Free);
        let deposit = test_deposit("Origin of the Species", &community);
        let invitation = test_invitation("reviewer@example.org", &deposit);
        InvitationParties::new(
            invitation,
            deposit,
            community,
            test_user("Eve", "Editor"),
            reviewer,
        )
    }

    #[test]
    fn test_reviewer_name_preferred() {
        let p = parties(Some(test_user("Ada", "Lovelace")));
        assert_eq!(p.reviewer_fullname_or_email(), "Ada Lovelace");
    }

    #[test]
    fn test_accepted_falls_back_to_addressee() {
        let event = ReviewInvitationAcceptedEvent::new(parties(None), EventContext::default());
        let addressee = "reviewer@example.org";

        let app = event.app_notification(None).unwrap();
        assert!(app.title.contains(addressee));
        assert!(app.body.contains(addressee));
        assert_eq!(app.user_id, event.parties.sender.id);

        let content = event.email_content().unwrap();
        assert_eq!(
            content.variables.get("REVIEWER_FULLNAME_OR_EMAIL"),
            Some(addressee)
        );

        let history = event.history().unwrap();
        assert_eq!(history.username, addressee);
        assert!(history.description.contains(addressee));

        assert!(event.push_notification().unwrap().body.contains(addressee));
    }

    #[test]
    fn test_confirmation_falls_back_to_addressee() {
        let event =
            ReviewInvitationAcceptedConfirmationEvent::new(parties(None), EventContext::default());
        let addressee = "reviewer@example.org";

        let app = event.app_notification(None).unwrap();
        assert_eq!(app.user_id, addressee);
        assert!(app.body.contains(addressee));
        assert_eq!(event.history().unwrap().username, addressee);
        assert_eq!(
            event
                .email_content()
                .unwrap()
                .variables
                .get("REVIEWER_FULLNAME_OR_EMAIL"),
            Some(addressee)
        );
    }

    #[test]
    fn test_created_variables() {
        let event = ReviewInvitationCreatedEvent::new(
            parties(Some(test_user("Ada", "Lovelace"))),
            EventContext::default(),
        );
        let content = event.email_content().unwrap();
        assert_eq!(content.variables.get("SENDER_FULLNAME"), Some("Eve Editor"));
        assert_eq!(content.variables.get("USER_FULLNAME"), Some("Ada Lovelace"));
        assert!(content.variables.contains_key("EDITOR_MESSAGE"));
        assert!(content.variables.contains_key("INVITATION_LINK"));
        assert!(event.app_notification(None).is_none());
    }

    #[test]
    fn test_rejected_reason_in_body() {
        let event = ReviewInvitationRejectedEvent::new(
            parties(None),
            Some("No time".to_string()),
            EventContext::default(),
        );
        assert!(event.app_notification(None).unwrap().body.ends_with("Reason: No time"));
    }
}

//! 平台邀请、聊天、通用通知与测试事件

use orvium_shared::models::{CommunitySnapshot, UserSnapshot};

use super::{EmailContent, NotificationEvent};
use crate::catalog::EventType;
use crate::links::EventContext;
use crate::payload::PushNotification;
use crate::template::variables::{
    EmailVariableSet, convert_to_email_community, convert_to_email_user,
};

/// 邀请同事加入平台
#[derive(Debug, Clone)]
pub struct InviteEvent {
    pub sender: UserSnapshot,
    pub addressee: String,
    pub community: Option<CommunitySnapshot>,
    pub ctx: EventContext,
}

impl InviteEvent {
    pub fn new(
        sender: UserSnapshot,
        addressee: impl Into<String>,
        community: Option<CommunitySnapshot>,
        ctx: EventContext,
    ) -> Self {
        Self {
            sender,
            addressee: addressee.into(),
            community,
            ctx,
        }
    }
}

impl NotificationEvent for InviteEvent {
    fn event_type(&self) -> EventType {
        EventType::Invite
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        self.community.as_ref()
    }

    fn email_content(&self) -> Option<EmailContent> {
        let mut variables = EmailVariableSet::base(&self.ctx.links)
            .merge(convert_to_email_user(&self.sender))
            .with("SENDER_FULLNAME", self.sender.full_name())
            .with("INVITATION_ADDRESSEE", &self.addressee);
        if let Some(community) = &self.community {
            variables = variables.merge(convert_to_email_community(community, &self.ctx.links));
        }
        Some(EmailContent::new(
            format!("{} invites you to join Orvium", self.sender.full_name()),
            variables,
        ))
    }
}

/// 新聊天消息
#[derive(Debug, Clone)]
pub struct ChatMessageEvent {
    pub sender: UserSnapshot,
    pub conversation_id: String,
    pub ctx: EventContext,
}

impl ChatMessageEvent {
    pub fn new(sender: UserSnapshot, conversation_id: impl Into<String>, ctx: EventContext) -> Self {
        Self {
            sender,
            conversation_id: conversation_id.into(),
            ctx,
        }
    }
}

impl NotificationEvent for ChatMessageEvent {
    fn event_type(&self) -> EventType {
        EventType::ChatMessage
    }

    fn email_content(&self) -> Option<EmailContent> {
        let variables = EmailVariableSet::base(&self.ctx.links)
            .with("SENDER_FULLNAME", self.sender.full_name())
            .with(
                "CONVERSATION_LINK",
                self.ctx.links.conversation_url(&self.conversation_id),
            );
        Some(EmailContent::new(
            format!("New message from {}", self.sender.full_name()),
            variables,
        ))
    }

    fn push_notification(&self) -> Option<PushNotification> {
        Some(
            PushNotification::new(
                format!("New message from {}", self.sender.full_name()),
                "You have received a new message.",
            )
            .with_action("open", "Open conversation"),
        )
    }
}

/// 未读消息提醒
#[derive(Debug, Clone)]
pub struct UnreadMessagesEvent {
    pub user: UserSnapshot,
    pub unread_count: u32,
    pub ctx: EventContext,
}

impl UnreadMessagesEvent {
    pub fn new(user: UserSnapshot, unread_count: u32, ctx: EventContext) -> Self {
        Self {
            user,
            unread_count,
            ctx,
        }
    }
}

impl NotificationEvent for UnreadMessagesEvent {
    fn event_type(&self) -> EventType {
        EventType::UnreadMessages
    }

    fn email_content(&self) -> Option<EmailContent> {
        let variables = EmailVariableSet::base(&self.ctx.links)
            .merge(convert_to_email_user(&self.user))
            .with("UNREAD_COUNT", self.unread_count.to_string())
            .with("CONVERSATION_LINK", self.ctx.links.chat_url());
        Some(EmailContent::new(
            format!("You have {} unread messages", self.unread_count),
            variables,
        ))
    }
}

/// 社区管理员发出的通用通知
#[derive(Debug, Clone)]
pub struct GeneralNotificationEvent {
    pub community: Option<CommunitySnapshot>,
    pub subject: String,
    /// HTML 正文
    pub body: String,
    pub ctx: EventContext,
}

impl GeneralNotificationEvent {
    pub fn new(
        community: Option<CommunitySnapshot>,
        subject: impl Into<String>,
        body: impl Into<String>,
        ctx: EventContext,
    ) -> Self {
        Self {
            community,
            subject: subject.into(),
            body: body.into(),
            ctx,
        }
    }
}

impl NotificationEvent for GeneralNotificationEvent {
    fn event_type(&self) -> EventType {
        EventType::GeneralNotification
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        self.community.as_ref()
    }

    fn email_content(&self) -> Option<EmailContent> {
        let mut variables =
            EmailVariableSet::base(&self.ctx.links).with("NOTIFICATION_BODY", &self.body);
        if let Some(community) = &self.community {
            variables = variables.merge(convert_to_email_community(community, &self.ctx.links));
        }
        Some(EmailContent::new(self.subject.clone(), variables))
    }
}

/// 推送渠道连通性测试
#[derive(Debug, Clone, Default)]
pub struct TestEvent {
    pub ctx: EventContext,
}

impl TestEvent {
    pub fn new(ctx: EventContext) -> Self {
        Self { ctx }
    }
}

impl NotificationEvent for TestEvent {
    fn event_type(&self) -> EventType {
        EventType::Test
    }

    fn push_notification(&self) -> Option<PushNotification> {
        Some(PushNotification::new(
            "Test notification",
            "This is a test notification from Orvium.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::renderer::TemplateRenderer;
    use orvium_shared::test_utils::test_user;

    #[test]
    fn test_chat_message_link() {
        let event = ChatMessageEvent::new(test_user("Ada", "Lovelace"), "conv-1", EventContext::default());
        let content = event.email_content().unwrap();
        assert_eq!(
            content.variables.get("CONVERSATION_LINK"),
            Some("https://dapp.orvium.io/chat?conversationId=conv-1")
        );
        assert_eq!(
            event.push_notification().unwrap().title,
            "New message from Ada Lovelace"
        );
    }

    #[test]
    fn test_general_notification_body_not_escaped() {
        let event = GeneralNotificationEvent::new(
            None,
            "Call for papers",
            "<p>Submit now</p>",
            EventContext::default(),
        );
        let email = event
            .email(&TemplateRenderer::strict(), "{{{NOTIFICATION_BODY}}}")
            .unwrap()
            .unwrap();
        assert_eq!(email.subject, "Call for papers");
        assert_eq!(email.html, "<p>Submit now</p>");
    }

    #[test]
    fn test_unread_count() {
        let event = UnreadMessagesEvent::new(test_user("A", "B"), 7, EventContext::default());
        let content = event.email_content().unwrap();
        assert_eq!(content.variables.get("UNREAD_COUNT"), Some("7"));
        assert_eq!(content.subject, "You have 7 unread messages");
    }

    #[test]
    fn test_test_event_is_push_only() {
        let event = TestEvent::default();
        assert!(event.push_notification().is_some());
        assert!(event.email_content().is_none());
        assert!(event.history().is_none());
        assert!(event.app_notification(Some("u")).is_none());
    }
}

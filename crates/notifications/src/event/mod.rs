//! 通知事件
//!
//! 每种事件类型对应一个结构体，构造时持有快照并预先计算展示字段。
//! 所有事件实现 [`NotificationEvent`]，按渠道生成互相独立的载荷：
//! 不产生某渠道的事件对应方法返回 `None`，只有邮件渲染可能失败。
//!
//! [`AppEvent`] 是全部事件的标签联合，供分发器按统一接口处理。

mod bundle;
pub mod community;
pub mod deposit;
pub mod invitation;
pub mod messaging;
pub mod review;

pub use bundle::PayloadBundle;
pub use community::{
    CommunityAcceptedEvent, CommunityChangedToPendingApprovalEvent, CommunitySubmittedEvent,
};
pub use deposit::{
    DepositChangedToDraftEvent, DepositPublishedEvent, DepositRejectedByModeratorEvent,
    DepositSubmittedEvent,
};
pub use invitation::{
    InvitationParties, ReviewInvitationAcceptedConfirmationEvent, ReviewInvitationAcceptedEvent,
    ReviewInvitationCreatedEvent, ReviewInvitationRejectedEvent,
};
pub use messaging::{
    ChatMessageEvent, GeneralNotificationEvent, InviteEvent, TestEvent, UnreadMessagesEvent,
};
pub use review::{
    ReviewChangedToDraftEvent, ReviewChangedToPendingApprovalEvent, ReviewPublishedEvent,
    ReviewSnapshots, ReviewSubmittedEvent,
};

use orvium_shared::models::CommunitySnapshot;

use crate::catalog::{ChannelSet, EventType, InternalType};
use crate::error::Result;
use crate::payload::{EmailPayload, HistoryLine, InAppNotification, PushNotification};
use crate::template::renderer::TemplateRenderer;
use crate::template::variables::EmailVariableSet;

/// 渲染前的邮件内容：主题与模板变量
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub variables: EmailVariableSet,
}

impl EmailContent {
    pub fn new(subject: impl Into<String>, variables: EmailVariableSet) -> Self {
        Self {
            subject: subject.into(),
            variables,
        }
    }
}

/// 通知事件能力接口
pub trait NotificationEvent: Send + Sync {
    fn event_type(&self) -> EventType;

    fn internal_type(&self) -> InternalType {
        self.event_type().internal_type()
    }

    fn email_template_name(&self) -> Option<&'static str> {
        self.event_type().email_template_name()
    }

    /// 事件所属社区，用于解析社区自定义模板
    fn community(&self) -> Option<&CommunitySnapshot> {
        None
    }

    /// 站内通知；`user_id` 为空时发给事件的默认接收人
    fn app_notification(&self, _user_id: Option<&str>) -> Option<InAppNotification> {
        None
    }

    /// 邮件主题与变量
    fn email_content(&self) -> Option<EmailContent> {
        None
    }

    /// 用给定模板源码渲染邮件
    fn email(&self, renderer: &TemplateRenderer, source: &str) -> Result<Option<EmailPayload>> {
        let Some(content) = self.email_content() else {
            return Ok(None);
        };
        let html = renderer.render(source, &content.variables)?;
        Ok(Some(EmailPayload {
            subject: content.subject,
            html,
        }))
    }

    fn push_notification(&self) -> Option<PushNotification> {
        None
    }

    fn history(&self) -> Option<HistoryLine> {
        None
    }
}

/// 全部事件的标签联合
#[derive(Debug, Clone)]
pub enum AppEvent {
    CommunitySubmitted(CommunitySubmittedEvent),
    CommunityAccepted(CommunityAcceptedEvent),
    CommunityChangedToPendingApproval(CommunityChangedToPendingApprovalEvent),
    DepositSubmitted(DepositSubmittedEvent),
    DepositPublished(DepositPublishedEvent),
    DepositChangedToDraft(DepositChangedToDraftEvent),
    DepositRejectedByModerator(DepositRejectedByModeratorEvent),
    ReviewSubmitted(ReviewSubmittedEvent),
    ReviewPublished(ReviewPublishedEvent),
    ReviewChangedToPendingApproval(ReviewChangedToPendingApprovalEvent),
    ReviewChangedToDraft(ReviewChangedToDraftEvent),
    ReviewInvitationCreated(ReviewInvitationCreatedEvent),
    ReviewInvitationAccepted(ReviewInvitationAcceptedEvent),
    ReviewInvitationAcceptedConfirmation(ReviewInvitationAcceptedConfirmationEvent),
    ReviewInvitationRejected(ReviewInvitationRejectedEvent),
    Invite(InviteEvent),
    ChatMessage(ChatMessageEvent),
    UnreadMessages(UnreadMessagesEvent),
    GeneralNotification(GeneralNotificationEvent),
    Test(TestEvent),
}

macro_rules! delegate {
    ($self:ident, $event:ident => $body:expr) => {
        match $self {
            AppEvent::CommunitySubmitted($event) => $body,
            AppEvent::CommunityAccepted($event) => $body,
            AppEvent::CommunityChangedToPendingApproval($event) => $body,
            AppEvent::DepositSubmitted($event) => $body,
            AppEvent::DepositPublished($event) => $body,
            AppEvent::DepositChangedToDraft($event) => $body,
            AppEvent::DepositRejectedByModerator($event) => $body,
            AppEvent::ReviewSubmitted($event) => $body,
            AppEvent::ReviewPublished($event) => $body,
            AppEvent::ReviewChangedToPendingApproval($event) => $body,
            AppEvent::ReviewChangedToDraft($event) => $body,
            AppEvent::ReviewInvitationCreated($event) => $body,
            AppEvent::ReviewInvitationAccepted($event) => $body,
            AppEvent::ReviewInvitationAcceptedConfirmation($event) => $body,
            AppEvent::ReviewInvitationRejected($event) => $body,
            AppEvent::Invite($event) => $body,
            AppEvent::ChatMessage($event) => $body,
            AppEvent::UnreadMessages($event) => $body,
            AppEvent::GeneralNotification($event) => $body,
            AppEvent::Test($event) => $body,
        }
    };
}

impl AppEvent {
    /// 实际产生载荷的渠道集合
    ///
    /// 用于核对事件实现与目录声明是否一致
    pub fn produced_channels(&self) -> ChannelSet {
        use crate::catalog::Channel;
        let mut set = ChannelSet::EMPTY;
        if self.app_notification(None).is_some() {
            set.insert(Channel::InApp);
        }
        if self.email_content().is_some() {
            set.insert(Channel::Email);
        }
        if self.push_notification().is_some() {
            set.insert(Channel::Push);
        }
        if self.history().is_some() {
            set.insert(Channel::History);
        }
        set
    }
}

impl NotificationEvent for AppEvent {
    fn event_type(&self) -> EventType {
        delegate!(self, e => e.event_type())
    }

    fn community(&self) -> Option<&CommunitySnapshot> {
        delegate!(self, e => e.community())
    }

    fn app_notification(&self, user_id: Option<&str>) -> Option<InAppNotification> {
        delegate!(self, e => e.app_notification(user_id))
    }

    fn email_content(&self) -> Option<EmailContent> {
        delegate!(self, e => e.email_content())
    }

    fn email(&self, renderer: &TemplateRenderer, source: &str) -> Result<Option<EmailPayload>> {
        delegate!(self, e => e.email(renderer, source))
    }

    fn push_notification(&self) -> Option<PushNotification> {
        delegate!(self, e => e.push_notification())
    }

    fn history(&self) -> Option<HistoryLine> {
        delegate!(self, e => e.history())
    }
}

macro_rules! impl_from_event {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for AppEvent {
                fn from(event: $ty) -> Self {
                    AppEvent::$variant(event)
                }
            }
        )*
    };
}

impl_from_event! {
    CommunitySubmitted => CommunitySubmittedEvent,
    CommunityAccepted => CommunityAcceptedEvent,
    CommunityChangedToPendingApproval => CommunityChangedToPendingApprovalEvent,
    DepositSubmitted => DepositSubmittedEvent,
    DepositPublished => DepositPublishedEvent,
    DepositChangedToDraft => DepositChangedToDraftEvent,
    DepositRejectedByModerator => DepositRejectedByModeratorEvent,
    ReviewSubmitted => ReviewSubmittedEvent,
    ReviewPublished => ReviewPublishedEvent,
    ReviewChangedToPendingApproval => ReviewChangedToPendingApprovalEvent,
    ReviewChangedToDraft => ReviewChangedToDraftEvent,
    ReviewInvitationCreated => ReviewInvitationCreatedEvent,
    ReviewInvitationAccepted => ReviewInvitationAcceptedEvent,
    ReviewInvitationAcceptedConfirmation => ReviewInvitationAcceptedConfirmationEvent,
    ReviewInvitationRejected => ReviewInvitationRejectedEvent,
    Invite => InviteEvent,
    ChatMessage => ChatMessageEvent,
    UnreadMessages => UnreadMessagesEvent,
    GeneralNotification => GeneralNotificationEvent,
    Test => TestEvent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::EventContext;

    #[test]
    fn test_delegation() {
        let event: AppEvent = TestEvent::new(EventContext::default()).into();
        assert_eq!(event.event_type(), EventType::Test);
        assert_eq!(event.internal_type(), InternalType::System);
        assert_eq!(event.email_template_name(), None);
        assert!(event.community().is_none());
        assert_eq!(event.produced_channels(), EventType::Test.channels());
    }
}

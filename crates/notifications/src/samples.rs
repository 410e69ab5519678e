//! 示例事件
//!
//! 用字段完整的示例快照构造事件，供模板预览和严格模式校验使用：
//! 所有可选占位符都有值，严格渲染失败只可能是模板引用了不存在的变量。

use orvium_shared::fixtures;
use orvium_shared::models::{CommunitySnapshot, SubscriptionPlan};

use crate::catalog::EventType;
use crate::error::Result;
use crate::event::{AppEvent, PayloadBundle};
use crate::links::{EventContext, SiteLinks};

/// 字段完整的示例载荷包
pub fn sample_bundle() -> PayloadBundle {
    let community = fixtures::community(
        "sample-community",
        "Orvium Sample Journal",
        SubscriptionPlan::Premium,
    );
    let deposit = fixtures::deposit("sample-deposit", "On the Origin of Species", &community);
    let user = fixtures::user("sample-user", "John", "Doe");
    let reviewer = fixtures::user("sample-reviewer", "Ada", "Lovelace");
    let review = fixtures::review("sample-review", &deposit, &reviewer);
    let invitation = fixtures::invitation("sample-invitation", "ada.lovelace@example.org", &deposit);

    PayloadBundle {
        user: Some(user),
        community: Some(community),
        deposit: Some(deposit),
        review: Some(review),
        invitation: Some(invitation),
        sender: Some(fixtures::user("sample-sender", "Eve", "Editor")),
        reviewer: Some(reviewer),
        reason: Some("Please review the formatting of the references.".to_string()),
        subject: Some("Call for papers".to_string()),
        message: Some("<p>The call for papers is now open.</p>".to_string()),
        addressee: Some("colleague@example.org".to_string()),
        conversation_id: Some("sample-conversation".to_string()),
        unread_count: Some(3),
    }
}

/// 构造某类型的示例事件
pub fn sample_event(event_type: EventType, links: &SiteLinks) -> Result<AppEvent> {
    AppEvent::from_bundle(event_type, sample_bundle(), EventContext::new(links.clone()))
}

/// 以真实社区替换示例社区后构造示例事件，用于预览
pub fn sample_event_for(
    event_type: EventType,
    links: &SiteLinks,
    community: &CommunitySnapshot,
) -> Result<AppEvent> {
    let mut bundle = sample_bundle();
    if let Some(deposit) = bundle.deposit.as_mut() {
        deposit.community_id = community.id.clone();
    }
    bundle.community = Some(community.clone());
    AppEvent::from_bundle(event_type, bundle, EventContext::new(links.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NotificationEvent;

    #[test]
    fn test_every_event_has_a_sample() {
        let links = SiteLinks::default();
        for event_type in EventType::ALL {
            let event = sample_event(event_type, &links).unwrap();
            assert_eq!(event.event_type(), event_type);
        }
    }

    #[test]
    fn test_sample_for_community() {
        let community = orvium_shared::test_utils::test_minimal_community("Bare");
        let event =
            sample_event_for(EventType::DepositSubmitted, &SiteLinks::default(), &community)
                .unwrap();
        assert_eq!(event.community().unwrap().name, "Bare");
    }

    #[test]
    fn test_sample_bundle_is_stable() {
        let first = sample_bundle();
        let second = sample_bundle();
        assert_eq!(first.deposit.unwrap().id, "sample-deposit");
        assert_eq!(first.user.unwrap().id, second.user.unwrap().id);
        assert_eq!(
            first.review.unwrap().creator_id,
            second.reviewer.unwrap().id
        );
    }
}

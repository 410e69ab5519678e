//! 分发流程集成测试
//!
//! 使用进程内渠道，覆盖模板选择、退订、历史去重与渠道故障隔离。

use std::sync::Arc;

use async_trait::async_trait;
use orvium_notifications::catalog::{Channel, EventType};
use orvium_notifications::channels::{
    EmailChannel, HistoryChannel, InAppChannel, NotificationChannel, PushChannel,
};
use orvium_notifications::dispatch::NotificationDispatcher;
use orvium_notifications::error::{NotificationError, Result};
use orvium_notifications::event::{AppEvent, PayloadBundle};
use orvium_notifications::links::{EventContext, SiteLinks};
use orvium_notifications::samples::sample_bundle;
use orvium_notifications::template::{
    InMemoryTemplateRepository, TemplateRenderer, TemplateRepository, TemplateService,
};
use orvium_notifications::types::{ChannelResult, Delivery, Recipient, SendStatus};
use orvium_shared::models::{CommunitySnapshot, SubscriptionPlan};
use orvium_shared::test_utils::test_community;

// ==================== 测试装置 ====================

struct Harness {
    dispatcher: NotificationDispatcher,
    repo: Arc<dyn TemplateRepository>,
    in_app: Arc<InAppChannel>,
    email: Arc<EmailChannel>,
    history: Arc<HistoryChannel>,
}

impl Harness {
    fn new() -> Self {
        let repo: Arc<dyn TemplateRepository> =
            Arc::new(InMemoryTemplateRepository::with_defaults());
        let in_app = Arc::new(InAppChannel::with_defaults());
        let email = Arc::new(EmailChannel::with_defaults());
        let history = Arc::new(HistoryChannel::with_defaults());

        let mut dispatcher = NotificationDispatcher::new(repo.clone(), TemplateRenderer::lenient());
        dispatcher.register_channel(in_app.clone());
        dispatcher.register_channel(email.clone());
        dispatcher.register_channel(Arc::new(PushChannel::with_defaults()));
        dispatcher.register_channel(history.clone());

        Self {
            dispatcher,
            repo,
            in_app,
            email,
            history,
        }
    }

    fn templates(&self) -> TemplateService {
        TemplateService::new(self.repo.clone(), SiteLinks::default())
    }
}

fn bundle_for(community: &CommunitySnapshot) -> PayloadBundle {
    let mut bundle = sample_bundle();
    if let Some(deposit) = bundle.deposit.as_mut() {
        deposit.community_id = community.id.clone();
    }
    bundle.community = Some(community.clone());
    bundle
}

fn event(event_type: EventType, community: &CommunitySnapshot) -> AppEvent {
    AppEvent::from_bundle(event_type, bundle_for(community), EventContext::default()).unwrap()
}

/// 总是返回异常的站内渠道
struct BrokenInAppChannel;

#[async_trait]
impl NotificationChannel for BrokenInAppChannel {
    fn channel(&self) -> Channel {
        Channel::InApp
    }

    fn name(&self) -> &str {
        "BrokenInApp"
    }

    async fn is_available(&self, _delivery: &Delivery) -> bool {
        true
    }

    async fn deliver(&self, _delivery: &Delivery) -> Result<ChannelResult> {
        Err(NotificationError::SendFailed {
            channel: "IN_APP".to_string(),
            reason: "inbox unavailable".to_string(),
        })
    }
}

// ==================== 模板选择 ====================

#[tokio::test]
async fn test_premium_override_and_free_default() {
    let harness = Harness::new();
    let premium = test_community("Premium Journal", SubscriptionPlan::Premium);
    let free = test_community("Free Journal", SubscriptionPlan::Free);

    harness
        .templates()
        .update_template(
            "deposit-submitted",
            &premium,
            "<p>Custom notice for {{PUBLICATION_TITLE}}</p>",
        )
        .await
        .unwrap();

    let recipients = [Recipient::email_only("author@example.org")];
    harness
        .dispatcher
        .dispatch(&event(EventType::DepositSubmitted, &premium), &recipients)
        .await
        .unwrap();
    harness
        .dispatcher
        .dispatch(&event(EventType::DepositSubmitted, &free), &recipients)
        .await
        .unwrap();

    let outbox = harness.email.outbox();
    assert_eq!(outbox.len(), 2);
    assert_eq!(
        outbox[0].html,
        "<p>Custom notice for On the Origin of Species</p>"
    );
    assert!(outbox[1].html.contains("has submitted"));
    assert!(outbox[1].html.contains("Free Journal"));
}

#[tokio::test]
async fn test_override_is_scoped_to_its_community() {
    let harness = Harness::new();
    let first = test_community("First Journal", SubscriptionPlan::Premium);
    let second = test_community("Second Journal", SubscriptionPlan::Premium);

    harness
        .templates()
        .update_template("deposit-submitted", &first, "<p>First only</p>")
        .await
        .unwrap();

    harness
        .dispatcher
        .dispatch(
            &event(EventType::DepositSubmitted, &second),
            &[Recipient::email_only("author@example.org")],
        )
        .await
        .unwrap();

    assert!(!harness.email.outbox()[0].html.contains("First only"));
}

#[tokio::test]
async fn test_broken_template_aborts_before_delivery() {
    let harness = Harness::new();
    let premium = test_community("Premium Journal", SubscriptionPlan::Premium);

    let default = harness
        .repo
        .find_default("deposit-submitted")
        .await
        .unwrap()
        .unwrap();
    harness
        .repo
        .save(default.customized_for(&premium.id, "{{#if PUBLICATION_TITLE}}unclosed"))
        .await
        .unwrap();

    let err = harness
        .dispatcher
        .dispatch(
            &event(EventType::DepositSubmitted, &premium),
            &[Recipient::user("u1").with_email("author@example.org")],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, NotificationError::TemplateCompilation(_)));
    assert!(harness.history.entries().is_empty());
    assert!(harness.email.outbox().is_empty());
}

// ==================== 接收人 ====================

#[tokio::test]
async fn test_opted_out_recipient_skips_community_email() {
    let harness = Harness::new();
    let community = test_community("Journal", SubscriptionPlan::Free);

    let report = harness
        .dispatcher
        .dispatch(
            &event(EventType::DepositChangedToDraft, &community),
            &[Recipient::user("u1")
                .with_email("author@example.org")
                .opted_out()],
        )
        .await
        .unwrap();

    let email: Vec<_> = report.results_for(Channel::Email).collect();
    assert_eq!(email.len(), 1);
    assert_eq!(email[0].status, SendStatus::Skipped);
    assert!(harness.email.outbox().is_empty());

    // 站内通知不受邮件退订影响
    assert_eq!(harness.in_app.inbox("u1").len(), 1);
    assert!(report.success);
}

#[tokio::test]
async fn test_opt_out_result_does_not_depend_on_other_recipients() {
    let harness = Harness::new();
    let community = test_community("Journal", SubscriptionPlan::Free);

    let report = harness
        .dispatcher
        .dispatch(
            &event(EventType::DepositChangedToDraft, &community),
            &[
                Recipient::email_only("author@example.org").opted_out(),
                Recipient::email_only("coauthor@example.org"),
            ],
        )
        .await
        .unwrap();

    let email: Vec<_> = report.results_for(Channel::Email).collect();
    assert_eq!(email.len(), 2);
    let skipped: Vec<_> = email
        .iter()
        .filter(|r| r.status == SendStatus::Skipped)
        .collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].recipient.as_deref(), Some("author@example.org"));

    let outbox = harness.email.outbox();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].to, "coauthor@example.org");
}

#[tokio::test]
async fn test_system_email_ignores_opt_out() {
    let harness = Harness::new();
    let community = test_community("Journal", SubscriptionPlan::Free);

    harness
        .dispatcher
        .dispatch(
            &event(EventType::CommunityAccepted, &community),
            &[Recipient::email_only("creator@example.org").opted_out()],
        )
        .await
        .unwrap();

    let outbox = harness.email.outbox();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].to, "creator@example.org");
}

#[tokio::test]
async fn test_history_written_once_for_many_recipients() {
    let harness = Harness::new();
    let community = test_community("Journal", SubscriptionPlan::Free);
    let recipients = [
        Recipient::user("u1"),
        Recipient::user("u2"),
        Recipient::user("u3"),
    ];

    let report = harness
        .dispatcher
        .dispatch(&event(EventType::DepositPublished, &community), &recipients)
        .await
        .unwrap();

    assert_eq!(harness.history.entries().len(), 1);
    assert_eq!(report.results_for(Channel::InApp).count(), 3);
    for user in ["u1", "u2", "u3"] {
        let inbox = harness.in_app.inbox(user);
        assert_eq!(inbox.len(), 1);
        assert!(inbox[0].body.contains("has been published in Journal"));
    }
}

#[tokio::test]
async fn test_invalid_address_fails_only_that_delivery() {
    let harness = Harness::new();
    let community = test_community("Journal", SubscriptionPlan::Free);

    let report = harness
        .dispatcher
        .dispatch(
            &event(EventType::DepositRejectedByModerator, &community),
            &[
                Recipient::email_only("not-an-address"),
                Recipient::email_only("author@example.org"),
            ],
        )
        .await
        .unwrap();

    assert!(!report.success);
    assert!(report.is_partial_success());
    assert_eq!(harness.email.outbox().len(), 1);
}

// ==================== 渠道 ====================

#[tokio::test]
async fn test_channel_error_does_not_block_other_channels() {
    let mut harness = Harness::new();
    harness
        .dispatcher
        .register_channel(Arc::new(BrokenInAppChannel));
    let community = test_community("Journal", SubscriptionPlan::Free);

    let report = harness
        .dispatcher
        .dispatch(
            &event(EventType::DepositChangedToDraft, &community),
            &[Recipient::user("u1").with_email("author@example.org")],
        )
        .await
        .unwrap();

    let in_app: Vec<_> = report.results_for(Channel::InApp).collect();
    assert_eq!(in_app[0].status, SendStatus::Failed);
    assert!(in_app[0].error.as_deref().unwrap().contains("inbox unavailable"));

    assert_eq!(harness.email.outbox().len(), 1);
    assert_eq!(harness.history.entries().len(), 1);
    assert!(report.is_partial_success());
}

#[tokio::test]
async fn test_unregistered_channel_is_skipped() {
    let repo: Arc<dyn TemplateRepository> = Arc::new(InMemoryTemplateRepository::with_defaults());
    let history = Arc::new(HistoryChannel::with_defaults());
    let mut dispatcher = NotificationDispatcher::new(repo, TemplateRenderer::lenient());
    dispatcher.register_channel(history.clone());

    let community = test_community("Journal", SubscriptionPlan::Free);
    let report = dispatcher
        .dispatch(
            &event(EventType::DepositPublished, &community),
            &[Recipient::user("u1")],
        )
        .await
        .unwrap();

    let in_app: Vec<_> = report.results_for(Channel::InApp).collect();
    assert_eq!(in_app[0].status, SendStatus::Skipped);
    assert_eq!(in_app[0].error.as_deref(), Some("no channel registered"));
    assert_eq!(history.entries().len(), 1);
    assert!(report.success);
}

#[tokio::test]
async fn test_dispatch_bundle_missing_snapshot() {
    let harness = Harness::new();

    let err = harness
        .dispatcher
        .dispatch_bundle(
            EventType::ReviewPublished,
            PayloadBundle::default(),
            EventContext::default(),
            &[Recipient::user("u1")],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, NotificationError::MissingSnapshot { .. }));
    assert!(harness.history.entries().is_empty());
}

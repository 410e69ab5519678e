//! 模板管理集成测试
//!
//! 社区管理员的预览、保存、重置流程。

use std::sync::Arc;

use orvium_notifications::error::NotificationError;
use orvium_notifications::links::SiteLinks;
use orvium_notifications::template::{
    InMemoryTemplateRepository, TemplateRepository, TemplateService, encode_template_braces,
};
use orvium_shared::models::SubscriptionPlan;
use orvium_shared::test_utils::test_community;

fn service() -> (TemplateService, Arc<dyn TemplateRepository>) {
    let repo: Arc<dyn TemplateRepository> = Arc::new(InMemoryTemplateRepository::with_defaults());
    (
        TemplateService::new(repo.clone(), SiteLinks::new("https://journal.example.org/")),
        repo,
    )
}

#[tokio::test]
async fn test_undefined_variable_is_bad_request() {
    let (service, repo) = service();
    let community = test_community("Journal", SubscriptionPlan::Premium);

    let err = service
        .update_template(
            "review-invitation",
            &community,
            "<p>Hello {{undefinedVar}}</p>",
        )
        .await
        .unwrap_err();

    assert!(err.is_bad_request());
    assert_eq!(err.error_code(), "TEMPLATE_VARIABLE_NOT_ALLOWED");
    assert_eq!(
        err.to_string(),
        "variable undefinedVar is not allowed in this template"
    );
    assert!(repo.list_custom(&community.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sanitizer_runs_before_save() {
    let (service, _) = service();
    let community = test_community("Journal", SubscriptionPlan::Premium);

    let source = concat!(
        "<p onclick=\"steal()\">{{PUBLICATION_TITLE}}</p>",
        "<script>alert(1)</script>",
        "<iframe src=\"https://www.youtube.com/embed/abc\"></iframe>",
        "<iframe src=\"https://evil.example.com/embed\"></iframe>",
    );
    let saved = service
        .update_template("deposit-submitted", &community, source)
        .await
        .unwrap();

    assert!(saved.is_override());
    assert!(saved.template.contains("{{PUBLICATION_TITLE}}"));
    assert!(!saved.template.contains("script"));
    assert!(!saved.template.contains("onclick"));
    assert!(saved.template.contains("https://www.youtube.com/embed/abc"));
    assert!(!saved.template.contains("evil.example.com"));
}

#[tokio::test]
async fn test_encoded_braces_are_restored() {
    let (service, _) = service();
    let community = test_community("Journal", SubscriptionPlan::Premium);

    let source = encode_template_braces(r#"<p><a href="{{PUBLICATION_LINK}}">Read</a></p>"#);
    let saved = service
        .update_template("deposit-submitted", &community, &source)
        .await
        .unwrap();

    assert!(saved.template.contains("{{PUBLICATION_LINK}}"));
    assert!(!saved.template.contains("%7B"));
}

#[tokio::test]
async fn test_preview_then_reset() {
    let (service, _) = service();
    let community = test_community("Journal", SubscriptionPlan::Premium);

    service
        .update_template("review-invitation", &community, "<p>Dear {{REVIEWER_FULLNAME_OR_EMAIL}}</p>")
        .await
        .unwrap();

    let preview = service
        .preview("review-invitation", Some(&community), None)
        .await
        .unwrap();
    assert_eq!(preview.html, "<p>Dear Ada Lovelace</p>");

    assert!(service.reset_template("review-invitation", &community).await.unwrap());
    assert!(!service.reset_template("review-invitation", &community).await.unwrap());

    let current = service
        .get_template("review-invitation", Some(&community))
        .await
        .unwrap();
    assert!(!current.is_override());

    let preview = service
        .preview("review-invitation", Some(&community), None)
        .await
        .unwrap();
    assert!(preview.html.contains("https://journal.example.org"));
}

#[tokio::test]
async fn test_unknown_template_name() {
    let (service, _) = service();
    let community = test_community("Journal", SubscriptionPlan::Premium);

    let err = service
        .update_template("does-not-exist", &community, "<p>x</p>")
        .await
        .unwrap_err();

    assert!(matches!(err, NotificationError::TemplateNotAssociated { .. }));
    assert_eq!(err.http_status(), 500);
}

#[tokio::test]
async fn test_free_community_cannot_customize() {
    let (service, _) = service();
    let community = test_community("Journal", SubscriptionPlan::Free);

    let err = service
        .update_template("deposit-submitted", &community, "<p>x</p>")
        .await
        .unwrap_err();

    assert_eq!(err.http_status(), 403);
}

//! 平台默认邮件模板

use chrono::Utc;

use super::store::EmailTemplate;
use crate::catalog::EventType;

/// (模板名, 标题, 描述, 正文)
const DEFAULTS: [(&str, &str, &str, &str); 18] = [
    (
        "community-submitted",
        "Community submitted",
        "Sent to platform administrators when a new community is submitted for approval",
        r#"<p>{{USER_FULLNAME}} has submitted the community <a href="{{COMMUNITY_LINK}}">{{COMMUNITY_NAME}}</a> for approval.</p>"#,
    ),
    (
        "community-accepted",
        "Community accepted",
        "Sent to the community creator when the community is accepted",
        r#"<p>Hi {{USER_FIRSTNAME}},</p><p>Your community <a href="{{COMMUNITY_LINK}}">{{COMMUNITY_NAME}}</a> has been accepted and is now live.</p>"#,
    ),
    (
        "community-changed-to-pending-approval",
        "Community pending approval",
        "Sent to platform administrators when a community is waiting for approval",
        r#"<p>The community <a href="{{COMMUNITY_LINK}}">{{COMMUNITY_NAME}}</a> is pending approval.</p>"#,
    ),
    (
        "deposit-submitted",
        "Publication submitted",
        "Sent to the author and moderators when a publication is submitted",
        r#"<p>{{USER_FULLNAME}} has submitted <a href="{{PUBLICATION_LINK}}">{{PUBLICATION_TITLE}}</a> to {{COMMUNITY_NAME}}.</p>"#,
    ),
    (
        "deposit-changed-to-draft",
        "Publication changed to draft",
        "Sent to the author when a moderator sends the publication back to draft",
        r#"<p>Hi {{USER_FULLNAME}},</p><p>Your publication <a href="{{PUBLICATION_LINK}}">{{PUBLICATION_TITLE}}</a> in {{COMMUNITY_NAME}} has been changed to draft.</p>{{#if MODERATOR_MESSAGE}}<blockquote>{{MODERATOR_MESSAGE}}</blockquote>{{/if}}"#,
    ),
    (
        "deposit-rejected",
        "Publication rejected",
        "Sent to the author when a moderator rejects the publication",
        r#"<p>Hi {{USER_FULLNAME}},</p><p>Your publication <a href="{{PUBLICATION_LINK}}">{{PUBLICATION_TITLE}}</a> has been rejected by the moderators of {{COMMUNITY_NAME}}.</p>{{#if MODERATOR_MESSAGE}}<blockquote>{{MODERATOR_MESSAGE}}</blockquote>{{/if}}"#,
    ),
    (
        "review-submitted-confirmation",
        "Review submitted",
        "Sent to the reviewer when the review is submitted",
        r#"<p>Hi {{USER_FULLNAME}},</p><p>Your <a href="{{REVIEW_LINK}}">review</a> of {{PUBLICATION_TITLE}} has been submitted to {{COMMUNITY_NAME}}.</p>"#,
    ),
    (
        "review-published-confirmation",
        "Review published",
        "Sent to the reviewer when the review is published",
        r#"<p>Hi {{USER_FULLNAME}},</p><p>Your <a href="{{REVIEW_LINK}}">review</a> of {{PUBLICATION_TITLE}} has been published.</p>"#,
    ),
    (
        "review-changed-to-pending-approval",
        "Review pending approval",
        "Sent to moderators when a review is waiting for approval",
        r#"<p>A new <a href="{{REVIEW_LINK}}">review</a> of {{PUBLICATION_TITLE}} is pending approval in {{COMMUNITY_NAME}}.</p>"#,
    ),
    (
        "review-changed-to-draft",
        "Review changed to draft",
        "Sent to the reviewer when a moderator sends the review back to draft",
        r#"<p>Hi {{USER_FULLNAME}},</p><p>Your <a href="{{REVIEW_LINK}}">review</a> of {{PUBLICATION_TITLE}} has been changed to draft.</p>{{#if MODERATOR_MESSAGE}}<blockquote>{{MODERATOR_MESSAGE}}</blockquote>{{/if}}"#,
    ),
    (
        "review-invitation",
        "Review invitation",
        "Sent to a reviewer invited to review a publication",
        r#"<p>Dear {{REVIEWER_FULLNAME_OR_EMAIL}},</p><p>{{SENDER_FULLNAME}} invites you to review <strong>{{PUBLICATION_TITLE}}</strong> in {{COMMUNITY_NAME}}.</p>{{#if EDITOR_MESSAGE}}<blockquote>{{EDITOR_MESSAGE}}</blockquote>{{/if}}{{#if INVITATION_DEADLINE}}<p>Deadline: {{INVITATION_DEADLINE}}</p>{{/if}}<p><a href="{{INVITATION_LINK}}">Answer the invitation</a></p>"#,
    ),
    (
        "review-invitation-accepted",
        "Review invitation accepted",
        "Sent to the editor when a reviewer accepts the invitation",
        r#"<p>{{REVIEWER_FULLNAME_OR_EMAIL}} has accepted the invitation to review <a href="{{PUBLICATION_LINK}}">{{PUBLICATION_TITLE}}</a>.</p>"#,
    ),
    (
        "review-invitation-accepted-confirmation",
        "Review invitation accepted confirmation",
        "Sent to the reviewer after accepting an invitation",
        r#"<p>Dear {{REVIEWER_FULLNAME_OR_EMAIL}},</p><p>Thank you for accepting to review <a href="{{PUBLICATION_LINK}}">{{PUBLICATION_TITLE}}</a> in {{COMMUNITY_NAME}}.</p>"#,
    ),
    (
        "review-invitation-rejected",
        "Review invitation rejected",
        "Sent to the editor when a reviewer declines the invitation",
        r#"<p>{{REVIEWER_FULLNAME_OR_EMAIL}} has declined the invitation to review <a href="{{PUBLICATION_LINK}}">{{PUBLICATION_TITLE}}</a>.</p>"#,
    ),
    (
        "invite",
        "Invitation to Orvium",
        "Sent when a user invites a colleague to join the platform",
        r#"<p>Hello {{INVITATION_ADDRESSEE}},</p><p>{{SENDER_FULLNAME}} has invited you to join <a href="{{ORVIUM_LINK}}">Orvium</a>.</p>"#,
    ),
    (
        "chat-message",
        "New chat message",
        "Sent when a user receives a new chat message",
        r#"<p>{{SENDER_FULLNAME}} has sent you a message. <a href="{{CONVERSATION_LINK}}">Open the conversation</a>.</p>"#,
    ),
    (
        "unread-messages",
        "Unread messages",
        "Periodic reminder about unread chat messages",
        r#"<p>Hi {{USER_FIRSTNAME}},</p><p>You have {{UNREAD_COUNT}} unread messages. <a href="{{CONVERSATION_LINK}}">Read them now</a>.</p>"#,
    ),
    (
        "general-notification",
        "General notification",
        "Free-form message sent by community managers",
        r#"{{#if COMMUNITY_NAME}}<h3>{{COMMUNITY_NAME}}</h3>{{/if}}{{{NOTIFICATION_BODY}}}"#,
    ),
];

/// 所有邮件共用的页脚
const FOOTER: &str = r#"<hr><p style="font-size:12px">Sent by <a href="{{ORVIUM_LINK}}">Orvium</a></p>"#;

/// 生成所有平台默认模板
pub fn default_templates() -> Vec<EmailTemplate> {
    let now = Utc::now();
    DEFAULTS
        .iter()
        .map(|(name, title, description, body)| EmailTemplate {
            name: name.to_string(),
            community: None,
            title: title.to_string(),
            description: description.to_string(),
            template: format!("{body}{FOOTER}"),
            is_customizable: EventType::from_template_name(name)
                .is_some_and(|t| t.is_customizable()),
            updated_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_default_maps_to_an_event() {
        for template in default_templates() {
            assert!(
                EventType::from_template_name(&template.name).is_some(),
                "{}",
                template.name
            );
            assert!(template.template.contains("{{ORVIUM_LINK}}"));
        }
    }

    #[test]
    fn test_defaults_cover_catalog() {
        let names: Vec<_> = default_templates().into_iter().map(|t| t.name).collect();
        for event_type in EventType::ALL {
            if let Some(name) = event_type.email_template_name() {
                assert!(names.iter().any(|n| n == name), "{name}");
            }
        }
    }

    #[test]
    fn test_customizable_flag() {
        let templates = default_templates();
        let find = |name: &str| templates.iter().find(|t| t.name == name).unwrap();
        assert!(find("deposit-submitted").is_customizable);
        assert!(find("review-invitation").is_customizable);
        assert!(!find("community-accepted").is_customizable);
        assert!(!find("invite").is_customizable);
    }
}

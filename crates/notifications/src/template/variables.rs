//! 邮件模板变量
//!
//! 把领域快照转换为扁平的占位符字典。源字段缺失时不写入对应的键，
//! 严格模式下引用该键的模板会因此失败。

use std::collections::BTreeMap;

use orvium_shared::models::{
    CommunitySnapshot, DepositSnapshot, InvitationSnapshot, ReviewKind, ReviewSnapshot, UserSnapshot,
};
use serde::{Deserialize, Serialize};

use crate::links::SiteLinks;

/// 邮件模板变量集合，作为 Handlebars 渲染上下文
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailVariableSet(BTreeMap<String, String>);

impl EmailVariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 只包含 `ORVIUM_LINK` 的基础集合
    pub fn base(links: &SiteLinks) -> Self {
        let mut set = Self::new();
        set.insert("ORVIUM_LINK", links.public_url());
        set
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// 值存在时才写入
    pub fn insert_opt<V: Into<String>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn merge(mut self, other: EmailVariableSet) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EmailVariableSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ==================== 快照转换 ====================

pub fn convert_to_email_user(user: &UserSnapshot) -> EmailVariableSet {
    let mut set = EmailVariableSet::new();
    set.insert("USER_FIRSTNAME", &user.first_name);
    set.insert("USER_LASTNAME", &user.last_name);
    set.insert("USER_FULLNAME", user.full_name());
    set.insert_opt("USER_EMAIL", user.email.as_deref());
    set
}

pub fn convert_to_email_community(
    community: &CommunitySnapshot,
    links: &SiteLinks,
) -> EmailVariableSet {
    let mut set = EmailVariableSet::new();
    set.insert("COMMUNITY_NAME", &community.name);
    set.insert("COMMUNITY_LINK", links.community_url(&community.id));
    set.insert_opt("COMMUNITY_LOGO", community.logo_url.as_deref());
    set.insert_opt("COMMUNITY_TWITTER", community.twitter_url.as_deref());
    set.insert_opt("COMMUNITY_FACEBOOK", community.facebook_url.as_deref());
    set.insert_opt("COMMUNITY_WEBSITE", community.website.as_deref());
    set
}

pub fn convert_to_email_publication(
    deposit: &DepositSnapshot,
    links: &SiteLinks,
) -> EmailVariableSet {
    let mut set = EmailVariableSet::new();
    set.insert("PUBLICATION_TITLE", &deposit.title);
    set.insert("PUBLICATION_LINK", links.deposit_url(&deposit.id));
    set.insert("PUBLICATION_VERSION", deposit.version.to_string());
    set.insert_opt("PUBLICATION_ABSTRACT", deposit.abstract_text.as_deref());
    set.insert_opt("PUBLICATION_DOI", deposit.doi.as_deref());
    if !deposit.authors.is_empty() {
        let authors = deposit
            .authors
            .iter()
            .map(|a| a.display_name())
            .collect::<Vec<_>>()
            .join(", ");
        set.insert("PUBLICATION_AUTHORS", authors);
    }
    set
}

pub fn convert_to_email_review(review: &ReviewSnapshot, links: &SiteLinks) -> EmailVariableSet {
    let mut set = EmailVariableSet::new();
    set.insert("REVIEW_LINK", links.review_url(&review.id));
    set.insert(
        "REVIEW_KIND",
        match review.kind {
            ReviewKind::PeerReview => "peer review",
            ReviewKind::CopyEditing => "copy editing",
        },
    );
    set.insert_opt("REVIEW_DECISION", review.decision.map(|d| d.label()));
    set
}

pub fn convert_to_email_invitation(
    invitation: &InvitationSnapshot,
    links: &SiteLinks,
) -> EmailVariableSet {
    let mut set = EmailVariableSet::new();
    set.insert("INVITATION_ADDRESSEE", &invitation.addressee);
    set.insert("INVITATION_LINK", links.invitations_url());
    set.insert_opt(
        "INVITATION_DEADLINE",
        invitation
            .deadline
            .map(|d| d.format("%Y-%m-%d").to_string()),
    );
    set.insert_opt("EDITOR_MESSAGE", invitation.message.as_deref());
    set
}

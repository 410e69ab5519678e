//! 站点链接与事件上下文

use chrono::{DateTime, Utc};

/// 站点链接生成器
///
/// 所有绝对链接都以配置中的公开地址为前缀，末尾的 `/` 会被去掉
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLinks {
    public_url: String,
}

impl SiteLinks {
    pub fn new(public_url: impl Into<String>) -> Self {
        let public_url: String = public_url.into();
        Self {
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.public_url, path)
    }

    /// 出版物站内路径，用作站内通知的跳转动作
    pub fn deposit_path(deposit_id: &str) -> String {
        format!("/deposits/{deposit_id}/view")
    }

    pub fn deposit_url(&self, deposit_id: &str) -> String {
        self.absolute(&Self::deposit_path(deposit_id))
    }

    pub fn community_path(community_id: &str) -> String {
        format!("/communities/{community_id}/view")
    }

    pub fn community_url(&self, community_id: &str) -> String {
        self.absolute(&Self::community_path(community_id))
    }

    pub fn review_path(review_id: &str) -> String {
        format!("/reviews/{review_id}/view")
    }

    pub fn review_url(&self, review_id: &str) -> String {
        self.absolute(&Self::review_path(review_id))
    }

    pub fn invitations_path() -> &'static str {
        "/profile/invitations"
    }

    pub fn invitations_url(&self) -> String {
        self.absolute(Self::invitations_path())
    }

    pub fn chat_path() -> &'static str {
        "/chat"
    }

    pub fn chat_url(&self) -> String {
        self.absolute(Self::chat_path())
    }

    pub fn conversation_path(conversation_id: &str) -> String {
        format!("/chat?conversationId={conversation_id}")
    }

    pub fn conversation_url(&self, conversation_id: &str) -> String {
        self.absolute(&Self::conversation_path(conversation_id))
    }
}

impl Default for SiteLinks {
    fn default() -> Self {
        Self::new("https://dapp.orvium.io")
    }
}

/// 事件上下文
///
/// 构造事件时捕获，载荷中的所有时间戳都取自 `occurred_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    pub links: SiteLinks,
    pub occurred_at: DateTime<Utc>,
}

impl EventContext {
    pub fn new(links: SiteLinks) -> Self {
        Self::at(links, Utc::now())
    }

    pub fn at(links: SiteLinks, occurred_at: DateTime<Utc>) -> Self {
        Self { links, occurred_at }
    }
}

impl Default for EventContext {
    fn default() -> Self {
        Self::new(SiteLinks::default())
    }
}

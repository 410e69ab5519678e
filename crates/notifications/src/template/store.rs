//! 邮件模板存储
//!
//! 平台默认模板以 `community = None` 存储，社区覆盖模板以社区 ID 区分。
//! 解析规则：付费社区存在覆盖模板时使用覆盖模板，否则使用平台默认模板。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use orvium_shared::models::CommunitySnapshot;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::defaults::default_templates;
use crate::error::{NotificationError, Result};

/// 邮件模板
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    pub name: String,
    /// 所属社区，平台默认模板为 None
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    pub title: String,
    pub description: String,
    pub template: String,
    pub is_customizable: bool,
    pub updated_at: DateTime<Utc>,
}

impl EmailTemplate {
    /// 基于默认模板生成某社区的覆盖模板
    pub fn customized_for(&self, community_id: &str, source: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            community: Some(community_id.to_string()),
            title: self.title.clone(),
            description: self.description.clone(),
            template: source.into(),
            is_customizable: self.is_customizable,
            updated_at: Utc::now(),
        }
    }

    pub fn is_override(&self) -> bool {
        self.community.is_some()
    }
}

/// 模板仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn find_default(&self, name: &str) -> Result<Option<EmailTemplate>>;
    async fn find_custom(&self, name: &str, community_id: &str) -> Result<Option<EmailTemplate>>;
    async fn list_defaults(&self) -> Result<Vec<EmailTemplate>>;
    async fn list_custom(&self, community_id: &str) -> Result<Vec<EmailTemplate>>;
    async fn save(&self, template: EmailTemplate) -> Result<EmailTemplate>;
    /// 删除覆盖模板，返回是否确实删除了记录
    async fn delete_custom(&self, name: &str, community_id: &str) -> Result<bool>;
}

type TemplateKey = (String, Option<String>);

/// 基于 DashMap 的内存模板仓储
#[derive(Default)]
pub struct InMemoryTemplateRepository {
    templates: DashMap<TemplateKey, EmailTemplate>,
}

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置所有平台默认模板
    pub fn with_defaults() -> Self {
        let repo = Self::new();
        for template in default_templates() {
            repo.insert(template);
        }
        repo
    }

    fn insert(&self, template: EmailTemplate) {
        let key = (template.name.clone(), template.community.clone());
        self.templates.insert(key, template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn find_default(&self, name: &str) -> Result<Option<EmailTemplate>> {
        let key = (name.to_string(), None);
        Ok(self.templates.get(&key).map(|t| t.value().clone()))
    }

    async fn find_custom(&self, name: &str, community_id: &str) -> Result<Option<EmailTemplate>> {
        let key = (name.to_string(), Some(community_id.to_string()));
        Ok(self.templates.get(&key).map(|t| t.value().clone()))
    }

    async fn list_defaults(&self) -> Result<Vec<EmailTemplate>> {
        let mut templates: Vec<_> = self
            .templates
            .iter()
            .filter(|t| t.community.is_none())
            .map(|t| t.value().clone())
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    async fn list_custom(&self, community_id: &str) -> Result<Vec<EmailTemplate>> {
        let mut templates: Vec<_> = self
            .templates
            .iter()
            .filter(|t| t.community.as_deref() == Some(community_id))
            .map(|t| t.value().clone())
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    async fn save(&self, template: EmailTemplate) -> Result<EmailTemplate> {
        debug!(
            template = %template.name,
            community = ?template.community,
            "保存邮件模板"
        );
        self.insert(template.clone());
        Ok(template)
    }

    async fn delete_custom(&self, name: &str, community_id: &str) -> Result<bool> {
        let key = (name.to_string(), Some(community_id.to_string()));
        Ok(self.templates.remove(&key).is_some())
    }
}

/// 解析某事件实际使用的模板
///
/// 付费社区的覆盖模板优先，缺少平台默认模板时返回 `TemplateNotFound`
pub async fn resolve_template(
    repo: &dyn TemplateRepository,
    name: &str,
    community: Option<&CommunitySnapshot>,
) -> Result<EmailTemplate> {
    if let Some(community) = community.filter(|c| c.is_premium())
        && let Some(custom) = repo.find_custom(name, &community.id).await?
    {
        debug!(template = name, community = %community.id, "使用社区自定义模板");
        return Ok(custom);
    }

    repo.find_default(name)
        .await?
        .ok_or_else(|| NotificationError::TemplateNotFound {
            name: name.to_string(),
        })
}

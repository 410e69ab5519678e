//! 模板管理服务
//!
//! 社区管理员查看、预览、自定义和重置邮件模板。
//!
//! 自定义模板的保存流程：
//! 1. 模板名必须对应某个事件
//! 2. 模板必须允许自定义，社区必须是付费社区
//! 3. 还原花括号 → HTML 清洗 → 再次还原花括号
//! 4. 用示例事件严格渲染，引用了不存在的变量即拒绝
//! 5. 保存为该社区的覆盖模板

use std::sync::Arc;

use orvium_shared::models::CommunitySnapshot;
use orvium_shared::observability::metrics;
use tracing::{info, instrument, warn};

use super::encoding::decode_template_braces;
use super::renderer::TemplateRenderer;
use super::sanitize::sanitize_template;
use super::store::{EmailTemplate, TemplateRepository, resolve_template};
use crate::catalog::EventType;
use crate::error::{NotificationError, Result};
use crate::event::NotificationEvent;
use crate::links::SiteLinks;
use crate::payload::EmailPayload;
use crate::samples::{sample_event, sample_event_for};

pub struct TemplateService {
    repo: Arc<dyn TemplateRepository>,
    links: SiteLinks,
    strict: TemplateRenderer,
    lenient: TemplateRenderer,
}

impl TemplateService {
    pub fn new(repo: Arc<dyn TemplateRepository>, links: SiteLinks) -> Self {
        Self {
            repo,
            links,
            strict: TemplateRenderer::strict(),
            lenient: TemplateRenderer::lenient(),
        }
    }

    fn event_type_for(name: &str) -> Result<EventType> {
        EventType::from_template_name(name).ok_or_else(|| NotificationError::TemplateNotAssociated {
            name: name.to_string(),
        })
    }

    async fn find_default(&self, name: &str) -> Result<EmailTemplate> {
        self.repo
            .find_default(name)
            .await?
            .ok_or_else(|| NotificationError::TemplateNotFound {
                name: name.to_string(),
            })
    }

    /// 列出模板，社区已覆盖的条目替换为覆盖模板
    pub async fn list_templates(
        &self,
        community: Option<&CommunitySnapshot>,
    ) -> Result<Vec<EmailTemplate>> {
        let defaults = self.repo.list_defaults().await?;
        let Some(community) = community else {
            return Ok(defaults);
        };

        let custom = self.repo.list_custom(&community.id).await?;
        Ok(defaults
            .into_iter()
            .map(|default| {
                custom
                    .iter()
                    .find(|c| c.name == default.name)
                    .cloned()
                    .unwrap_or(default)
            })
            .collect())
    }

    /// 获取某社区实际使用的模板
    pub async fn get_template(
        &self,
        name: &str,
        community: Option<&CommunitySnapshot>,
    ) -> Result<EmailTemplate> {
        Self::event_type_for(name)?;
        resolve_template(self.repo.as_ref(), name, community).await
    }

    /// 用示例数据预览模板
    ///
    /// 未提供源码时预览当前生效的模板；预览使用宽松模式
    pub async fn preview(
        &self,
        name: &str,
        community: Option<&CommunitySnapshot>,
        source: Option<&str>,
    ) -> Result<EmailPayload> {
        let event_type = Self::event_type_for(name)?;
        let source = match source {
            Some(source) => source.to_string(),
            None => resolve_template(self.repo.as_ref(), name, community)
                .await?
                .template,
        };

        let event = match community {
            Some(community) => sample_event_for(event_type, &self.links, community)?,
            None => sample_event(event_type, &self.links)?,
        };
        event
            .email(&self.lenient, &source)?
            .ok_or_else(|| NotificationError::TemplateNotAssociated {
                name: name.to_string(),
            })
    }

    /// 保存社区自定义模板
    #[instrument(skip(self, community, source), fields(template = name, community = %community.id))]
    pub async fn update_template(
        &self,
        name: &str,
        community: &CommunitySnapshot,
        source: &str,
    ) -> Result<EmailTemplate> {
        let event_type = Self::event_type_for(name)?;
        let default = self.find_default(name).await?;

        if !default.is_customizable {
            return Err(NotificationError::CustomizationForbidden {
                name: name.to_string(),
                reason: "template is not customizable".to_string(),
            });
        }
        if !community.is_premium() {
            return Err(NotificationError::CustomizationForbidden {
                name: name.to_string(),
                reason: "custom templates require a premium subscription".to_string(),
            });
        }

        let cleaned = decode_template_braces(&sanitize_template(&decode_template_braces(source)));

        let sample = sample_event(event_type, &self.links)?;
        if let Err(e) = sample.email(&self.strict, &cleaned) {
            metrics::record_render_failure(name);
            warn!(error = %e, "自定义模板校验失败");
            return Err(e);
        }

        let saved = self
            .repo
            .save(default.customized_for(&community.id, cleaned))
            .await?;
        info!("社区自定义模板已保存");
        Ok(saved)
    }

    /// 删除社区覆盖模板，恢复为平台默认
    #[instrument(skip(self, community), fields(template = name, community = %community.id))]
    pub async fn reset_template(&self, name: &str, community: &CommunitySnapshot) -> Result<bool> {
        Self::event_type_for(name)?;
        let removed = self.repo.delete_custom(name, &community.id).await?;
        info!(removed, "社区自定义模板已重置");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::store::{InMemoryTemplateRepository, MockTemplateRepository};
    use orvium_shared::models::SubscriptionPlan;
    use orvium_shared::test_utils::test_community;

    fn service() -> TemplateService {
        TemplateService::new(
            Arc::new(InMemoryTemplateRepository::with_defaults()),
            SiteLinks::default(),
        )
    }

    #[tokio::test]
    async fn test_update_rejects_undefined_variable() {
        let premium = test_community("Premium", SubscriptionPlan::Premium);
        let err = service()
            .update_template("deposit-submitted", &premium, "<p>{{undefinedVar}}</p>")
            .await
            .unwrap_err();

        assert!(err.is_bad_request());
        assert!(err.to_string().contains("undefinedVar"));
    }

    #[tokio::test]
    async fn test_update_unknown_template() {
        let premium = test_community("Premium", SubscriptionPlan::Premium);
        let err = service()
            .update_template("not-a-template", &premium, "<p>x</p>")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "template not-a-template is not associated with any event"
        );
    }

    #[tokio::test]
    async fn test_update_requires_premium() {
        let free = test_community("Free", SubscriptionPlan::Free);
        let err = service()
            .update_template("deposit-submitted", &free, "<p>{{USER_FULLNAME}}</p>")
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), 403);
    }

    #[tokio::test]
    async fn test_update_rejects_system_template() {
        let premium = test_community("Premium", SubscriptionPlan::Premium);
        let err = service()
            .update_template("community-accepted", &premium, "<p>hi</p>")
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::CustomizationForbidden { .. }));
    }

    #[tokio::test]
    async fn test_update_sanitizes_and_saves() {
        let premium = test_community("Premium", SubscriptionPlan::Premium);
        let service = service();
        let saved = service
            .update_template(
                "deposit-submitted",
                &premium,
                r#"<p>{{USER_FULLNAME}}</p><a href="%7B%7BPUBLICATION_LINK%7D%7D">x</a><script>alert(1)</script>"#,
            )
            .await
            .unwrap();

        assert!(!saved.template.contains("script"));
        assert!(saved.template.contains("{{PUBLICATION_LINK}}"));
        assert_eq!(saved.community.as_deref(), Some(premium.id.as_str()));

        let resolved = service
            .get_template("deposit-submitted", Some(&premium))
            .await
            .unwrap();
        assert_eq!(resolved, saved);

        assert!(service.reset_template("deposit-submitted", &premium).await.unwrap());
        let resolved = service
            .get_template("deposit-submitted", Some(&premium))
            .await
            .unwrap();
        assert!(resolved.community.is_none());
    }

    #[tokio::test]
    async fn test_preview_renders_sample() {
        let preview = service()
            .preview("deposit-submitted", None, Some("<p>{{PUBLICATION_TITLE}}</p>"))
            .await
            .unwrap();
        assert_eq!(preview.html, "<p>On the Origin of Species</p>");
    }

    #[tokio::test]
    async fn test_list_merges_overrides() {
        let premium = test_community("Premium", SubscriptionPlan::Premium);
        let service = service();
        service
            .update_template("review-invitation", &premium, "<p>{{SENDER_FULLNAME}}</p>")
            .await
            .unwrap();

        let listed = service.list_templates(Some(&premium)).await.unwrap();
        let defaults = service.list_templates(None).await.unwrap();
        assert_eq!(listed.len(), defaults.len());
        assert_eq!(listed.iter().filter(|t| t.is_override()).count(), 1);
    }

    #[tokio::test]
    async fn test_update_does_not_save_when_validation_fails() {
        let mut repo = MockTemplateRepository::new();
        repo.expect_find_default().returning(|name| {
            Ok(crate::template::defaults::default_templates()
                .into_iter()
                .find(|t| t.name == name))
        });
        repo.expect_save().never();

        let service = TemplateService::new(Arc::new(repo), SiteLinks::default());
        let premium = test_community("Premium", SubscriptionPlan::Premium);
        let result = service
            .update_template("deposit-submitted", &premium, "{{NOPE}}")
            .await;
        assert!(result.is_err());
    }
}

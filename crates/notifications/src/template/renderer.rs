//! 邮件模板渲染器
//!
//! 基于 Handlebars 渲染模板源码。严格模式下引用缺失变量会失败，
//! 失败信息会被解析为具体的变量名，返回给编辑模板的管理员。

use std::sync::LazyLock;

use handlebars::{Handlebars, RenderError, RenderErrorReason};
use regex::Regex;
use tracing::debug;

use super::encoding::decode_template_braces;
use super::variables::EmailVariableSet;
use crate::error::{NotificationError, Result};

/// 从错误信息中提取第一个被双引号包裹的片段
static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());

/// 渲染器配置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererConfig {
    /// 严格模式：缺失变量视为错误
    pub strict: bool,
}

impl RendererConfig {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

/// 模板渲染器
///
/// 不持有任何已注册模板，每次渲染都直接编译传入的源码
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
    config: RendererConfig,
}

impl TemplateRenderer {
    pub fn new(config: RendererConfig) -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(config.strict);
        Self { registry, config }
    }

    pub fn strict() -> Self {
        Self::new(RendererConfig::strict())
    }

    pub fn lenient() -> Self {
        Self::new(RendererConfig::lenient())
    }

    pub fn config(&self) -> RendererConfig {
        self.config
    }

    pub fn is_strict(&self) -> bool {
        self.config.strict
    }

    /// 渲染模板
    ///
    /// 先还原被百分号编码的花括号，再以变量集合为上下文渲染
    pub fn render(&self, source: &str, variables: &EmailVariableSet) -> Result<String> {
        let source = decode_template_braces(source);
        self.registry
            .render_template(&source, variables)
            .map_err(|e| self.map_render_error(e))
    }

    fn map_render_error(&self, err: RenderError) -> NotificationError {
        let detail = err.reason().to_string();
        debug!(strict = self.config.strict, error = %detail, "模板渲染失败");

        if let RenderErrorReason::MissingVariable(path) = err.reason() {
            let name = extract_quoted(&detail).or_else(|| path.clone());
            if let Some(name) = name {
                return NotificationError::TemplateVariable { name };
            }
        }

        NotificationError::TemplateCompilation(detail)
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::lenient()
    }
}

/// 提取错误信息中被引号包裹的名称
pub fn extract_quoted(message: &str) -> Option<String> {
    QUOTED
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> EmailVariableSet {
        [("USER_FULLNAME", "John Doe"), ("COMMUNITY_NAME", "Orvium")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_render_substitutes_variables() {
        let renderer = TemplateRenderer::lenient();
        let html = renderer
            .render("<p>Hello {{USER_FULLNAME}} from {{COMMUNITY_NAME}}</p>", &vars())
            .unwrap();
        assert_eq!(html, "<p>Hello John Doe from Orvium</p>");
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = TemplateRenderer::strict();
        let source = "{{USER_FULLNAME}} / {{COMMUNITY_NAME}}";
        let first = renderer.render(source, &vars()).unwrap();
        let second = renderer.render(source, &vars()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lenient_missing_variable_renders_empty() {
        let renderer = TemplateRenderer::lenient();
        let html = renderer.render("[{{MISSING}}]", &vars()).unwrap();
        assert_eq!(html, "[]");
    }

    #[test]
    fn test_strict_missing_variable_names_it() {
        let renderer = TemplateRenderer::strict();
        let err = renderer
            .render("<p>{{undefinedVar}}</p>", &vars())
            .unwrap_err();

        assert!(err.is_bad_request());
        assert!(err.to_string().contains("undefinedVar"));
        assert!(matches!(err, NotificationError::TemplateVariable { .. }));
    }

    #[test]
    fn test_syntax_error_is_compilation_error() {
        let renderer = TemplateRenderer::strict();
        let err = renderer.render("{{#if USER_FULLNAME}}", &vars()).unwrap_err();
        assert!(matches!(err, NotificationError::TemplateCompilation(_)));
        assert!(err.is_bad_request());
    }

    #[test]
    fn test_encoded_braces_are_decoded() {
        let renderer = TemplateRenderer::strict();
        let html = renderer
            .render(r#"<a href="%7B%7BUSER_FULLNAME%7D%7D">x</a>"#, &vars())
            .unwrap();
        assert_eq!(html, r#"<a href="John Doe">x</a>"#);
    }

    #[test]
    fn test_extract_quoted() {
        assert_eq!(
            extract_quoted(r#"Failed to access variable in strict mode Some("FOO")"#),
            Some("FOO".to_string())
        );
        assert_eq!(extract_quoted("no quotes here"), None);
    }
}

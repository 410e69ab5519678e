//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::error::{PlatformError, Result};

/// 站点配置
///
/// `public_url` 用于拼接邮件中的绝对链接（社区、出版物、评审页面等）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub public_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            public_url: "https://dapp.orvium.io".to_string(),
        }
    }
}

/// 邮件渠道配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub enabled: bool,
    pub from_address: String,
    pub from_name: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            from_address: "no-reply@orvium.io".to_string(),
            from_name: "Orvium".to_string(),
        }
    }
}

/// 推送渠道配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub enabled: bool,
    /// 推送通知默认图标
    pub icon: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            icon: "https://assets.orvium.io/icons/icon-96x96.png".to_string(),
        }
    }
}

/// 站内信与历史记录渠道开关
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InternalChannelsConfig {
    pub in_app_enabled: bool,
    pub history_enabled: bool,
}

impl Default for InternalChannelsConfig {
    fn default() -> Self {
        Self {
            in_app_enabled: true,
            history_enabled: true,
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
    pub metrics_enabled: bool,
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_port: 9090,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub site: SiteConfig,
    pub mail: MailConfig,
    pub push: PushConfig,
    pub channels: InternalChannelsConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. `.env` 文件（仅填充进程环境变量）
    /// 2. config/default.toml（默认配置）
    /// 3. config/{environment}.toml（环境特定配置）
    /// 4. config/{service_name}.toml（服务特定配置）
    /// 5. 环境变量（ORVIUM__ 前缀，如 ORVIUM__SITE__PUBLIC_URL -> site.public_url）
    pub fn load(service_name: &str) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let env = std::env::var("ORVIUM_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
        Self::load_from(service_name, &env, Path::new(&config_dir))
    }

    /// 从指定目录加载配置，不读取 `.env`
    pub fn load_from(service_name: &str, env: &str, config_dir: &Path) -> Result<Self> {
        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", env))).required(false))
            .add_source(
                File::from(config_dir.join(format!("{}.toml", service_name))).required(false),
            )
            // 双下划线分隔层级，单下划线保留给字段名（public_url 等）
            .add_source(
                Environment::with_prefix("ORVIUM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 校验加载结果中无法由类型表达的约束
    pub fn validate(&self) -> Result<()> {
        let url = self.site.public_url.as_str();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(PlatformError::invalid_config(
                "site.public_url",
                format!("must be an http(s) URL, got {url:?}"),
            ));
        }
        if !matches!(self.observability.log_format.as_str(), "json" | "pretty") {
            return Err(PlatformError::invalid_config(
                "observability.log_format",
                format!(
                    "must be json or pretty, got {:?}",
                    self.observability.log_format
                ),
            ));
        }
        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

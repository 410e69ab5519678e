//! 根据配置组装分发器

use std::sync::Arc;

use orvium_notifications::channels::{
    ChannelConfig, EmailChannel, HistoryChannel, InAppChannel, PushChannel,
};
use orvium_notifications::dispatch::NotificationDispatcher;
use orvium_notifications::links::SiteLinks;
use orvium_notifications::template::{InMemoryTemplateRepository, TemplateRenderer};
use orvium_shared::config::AppConfig;
use tracing::info;

use crate::error::Result;

/// 加载配置，命令行指定的日志级别优先
pub fn load_config(service_name: &str, log_level: Option<String>) -> Result<AppConfig> {
    let mut config = AppConfig::load(service_name)?;
    if let Some(level) = log_level {
        config.observability.log_level = level;
    }
    Ok(config)
}

/// 使用默认模板和配置中的渠道开关构造分发器
pub fn build_dispatcher(config: &AppConfig) -> NotificationDispatcher {
    let mut dispatcher = NotificationDispatcher::new(
        Arc::new(InMemoryTemplateRepository::with_defaults()),
        TemplateRenderer::lenient(),
    );

    dispatcher.register_channel(Arc::new(InAppChannel::new(ChannelConfig::new(
        config.channels.in_app_enabled,
    ))));
    dispatcher.register_channel(Arc::new(EmailChannel::new(
        ChannelConfig::new(config.mail.enabled),
        &config.mail.from_name,
        &config.mail.from_address,
    )));
    dispatcher.register_channel(Arc::new(
        PushChannel::new(ChannelConfig::new(config.push.enabled)).with_icon(&config.push.icon),
    ));
    dispatcher.register_channel(Arc::new(HistoryChannel::new(ChannelConfig::new(
        config.channels.history_enabled,
    ))));

    info!(
        channels = ?dispatcher.registered_channels(),
        public_url = %config.site.public_url,
        "分发器已就绪"
    );
    dispatcher
}

/// 邮件链接使用的站点地址
pub fn site_links(config: &AppConfig) -> SiteLinks {
    SiteLinks::new(&config.site.public_url)
}

//! 日志初始化模块
//!
//! 基于 tracing-subscriber 组合环境过滤器与格式化层，
//! 支持 JSON（结构化，生产环境）与 pretty（本地开发）两种输出。

use anyhow::Result;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::ObservabilityConfig;

/// 构建环境过滤器
///
/// `RUST_LOG` 优先，其次使用配置中的日志级别，均无效时回退到 info
pub fn build_env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 是否使用 JSON 格式输出
pub fn is_json_format(config: &ObservabilityConfig) -> bool {
    config.log_format.eq_ignore_ascii_case("json")
}

/// 初始化 tracing 日志
///
/// 重复初始化（例如测试中多次调用）会返回错误，由调用方决定是否忽略
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let env_filter = build_env_filter(&config.log_level);

    let fmt_layer = if is_json_format(config) {
        fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

//! 统一可观测性模块
//!
//! 提供 logging 与 metrics 的统一初始化。
//! 所有服务通过单一入口点配置可观测性，确保一致的日志格式和指标命名。

pub mod metrics;
pub mod tracing;

use ::tracing::info;
use anyhow::Result;

use crate::config::AppConfig;

/// 可观测性资源守卫
///
/// 持有各种可观测性资源的生命周期，Drop 时记录关闭日志。
pub struct ObservabilityGuard {
    _metrics_handle: Option<metrics::MetricsHandle>,
}

impl ObservabilityGuard {
    /// 创建一个空的 Guard（用于测试或禁用可观测性时）
    pub fn empty() -> Self {
        Self {
            _metrics_handle: None,
        }
    }
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        info!("Shutting down observability...");
    }
}

/// 统一初始化可观测性
///
/// 初始化顺序：
/// 1. Tracing（日志）
/// 2. Metrics（Prometheus 指标，仅在配置启用时）
///
/// # Example
///
/// ```ignore
/// use orvium_shared::{config::AppConfig, observability};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = AppConfig::load("notification-worker")?;
///     let _guard = observability::init(&config)?;
///     Ok(())
/// }
/// ```
pub fn init(config: &AppConfig) -> Result<ObservabilityGuard> {
    tracing::init(&config.observability)?;

    info!(
        service = %config.service_name,
        environment = %config.environment,
        metrics_enabled = config.observability.metrics_enabled,
        "Observability initialized"
    );

    let metrics_handle = if config.observability.metrics_enabled {
        Some(metrics::init(&config.service_name, config.observability.metrics_port)?)
    } else {
        None
    };

    Ok(ObservabilityGuard {
        _metrics_handle: metrics_handle,
    })
}

//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

/// 单次投递计数，标签：channel、status
pub const NOTIFICATION_DELIVERIES_TOTAL: &str = "notification_deliveries_total";
/// 单个事件分发耗时
pub const NOTIFICATION_DISPATCH_DURATION_SECONDS: &str = "notification_dispatch_duration_seconds";
/// 模板渲染失败计数
pub const TEMPLATE_RENDER_FAILURES_TOTAL: &str = "template_render_failures_total";

/// Metrics 资源守卫
pub struct MetricsHandle {
    pub addr: SocketAddr,
}

/// 初始化 Prometheus 指标导出
///
/// 在指定端口启动 exporter 自带的 HTTP 监听，必须在 tokio 运行时内调用。
pub fn init(service_name: &str, port: u16) -> Result<MetricsHandle> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .add_global_label("service", service_name.to_string())
        .install()?;

    describe_metrics();

    info!(%addr, "Prometheus exporter listening");

    Ok(MetricsHandle { addr })
}

/// 注册指标描述，会出现在 /metrics 端点的 HELP 注释中
fn describe_metrics() {
    metrics::describe_counter!(
        NOTIFICATION_DELIVERIES_TOTAL,
        "Total number of notification deliveries by channel and status"
    );
    metrics::describe_histogram!(
        NOTIFICATION_DISPATCH_DURATION_SECONDS,
        "Duration of a single event dispatch in seconds"
    );
    metrics::describe_counter!(
        TEMPLATE_RENDER_FAILURES_TOTAL,
        "Total number of email template render failures"
    );
}

// ============================================================================
// 便捷的指标记录函数
// ============================================================================

/// 记录单次渠道投递
#[inline]
pub fn record_delivery(channel: &str, status: &str) {
    metrics::counter!(
        NOTIFICATION_DELIVERIES_TOTAL,
        "channel" => channel.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// 记录单个事件的分发耗时
#[inline]
pub fn record_dispatch(event_type: &str, duration_secs: f64) {
    metrics::histogram!(
        NOTIFICATION_DISPATCH_DURATION_SECONDS,
        "event_type" => event_type.to_string()
    )
    .record(duration_secs);
}

/// 记录模板渲染失败
#[inline]
pub fn record_render_failure(template_name: &str) {
    metrics::counter!(
        TEMPLATE_RENDER_FAILURES_TOTAL,
        "template" => template_name.to_string()
    )
    .increment(1);
}

//! 事件信封消费者
//!
//! 输入为 JSON Lines，每行一个事件信封。空行忽略，
//! 其余每行读到即处理：解析、校验、分发依次执行，
//! 任一步失败都只记为该行的失败。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use orvium_notifications::bulk::BulkSummary;
use orvium_notifications::catalog::EventType;
use orvium_notifications::dispatch::NotificationDispatcher;
use orvium_notifications::event::PayloadBundle;
use orvium_notifications::links::{EventContext, SiteLinks};
use orvium_notifications::types::{DispatchReport, Recipient};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::error::{Result, WorkerError};

/// 事件信封
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub event_type: EventType,
    #[serde(default)]
    pub bundle: PayloadBundle,
    #[validate(length(min = 1), nested)]
    pub recipients: Vec<Recipient>,
    /// 缺省时使用处理时间
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl EventEnvelope {
    fn context(&self, links: &SiteLinks) -> EventContext {
        match self.occurred_at {
            Some(ts) => EventContext::at(links.clone(), ts),
            None => EventContext::new(links.clone()),
        }
    }
}

/// 信封消费者
pub struct EnvelopeConsumer {
    dispatcher: Arc<NotificationDispatcher>,
    links: SiteLinks,
}

impl EnvelopeConsumer {
    pub fn new(dispatcher: Arc<NotificationDispatcher>, links: SiteLinks) -> Self {
        Self { dispatcher, links }
    }

    /// 解析并校验一行输入
    pub fn parse_line(line: &str) -> Result<EventEnvelope> {
        let envelope: EventEnvelope = serde_json::from_str(line)?;
        envelope.validate()?;
        Ok(envelope)
    }

    /// 分发单个信封
    #[instrument(skip(self, envelope), fields(event_type = %envelope.event_type))]
    pub async fn handle(&self, envelope: EventEnvelope) -> Result<DispatchReport> {
        let ctx = envelope.context(&self.links);
        let report = self
            .dispatcher
            .dispatch_bundle(envelope.event_type, envelope.bundle, ctx, &envelope.recipients)
            .await?;
        debug!(
            dispatch_id = %report.dispatch_id,
            results = report.channel_results.len(),
            "信封已分发"
        );
        Ok(report)
    }

    /// 处理一行：存在失败的渠道投递时该行记为失败
    async fn process_line(&self, line: &str) -> Result<()> {
        let envelope = Self::parse_line(line)?;
        let report = self.handle(envelope).await?;
        if report.success {
            Ok(())
        } else {
            Err(WorkerError::DeliveryFailed {
                failed: report.failure_count(),
                total: report.channel_results.len(),
            })
        }
    }

    /// 逐行读取并立即处理，不等待输入结束
    pub async fn run<R>(&self, reader: R) -> Result<BulkSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        info!("开始处理事件信封");

        let mut lines = reader.lines();
        let mut summary = BulkSummary::default();
        let mut number = 0usize;
        while let Some(line) = lines.next_line().await? {
            number += 1;
            if line.trim().is_empty() {
                continue;
            }
            summary.record(format!("line {number}"), self.process_line(&line).await);
        }

        Ok(summary.finish())
    }
}

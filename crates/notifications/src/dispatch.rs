//! 事件分发
//!
//! 分发器接收事件和接收人列表：
//! 1. 解析并渲染邮件模板（社区覆盖模板优先），渲染失败时不投递任何载荷
//! 2. 历史记录每个事件只写一次
//! 3. 按接收人生成站内通知、推送和邮件投递
//! 4. 各投递并发执行，单个渠道失败不影响其他渠道

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use orvium_shared::observability::metrics;
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::{Channel, EventType, InternalType};
use crate::channels::{
    EmailChannel, HistoryChannel, InAppChannel, NotificationChannel, PushChannel,
};
use crate::error::Result;
use crate::event::{AppEvent, NotificationEvent, PayloadBundle};
use crate::links::EventContext;
use crate::payload::EmailPayload;
use crate::template::renderer::TemplateRenderer;
use crate::template::store::{InMemoryTemplateRepository, TemplateRepository, resolve_template};
use crate::types::{ChannelResult, Delivery, DeliveryContent, DispatchReport, Recipient};

/// 通知分发器
pub struct NotificationDispatcher {
    channels: Vec<Arc<dyn NotificationChannel>>,
    templates: Arc<dyn TemplateRepository>,
    renderer: TemplateRenderer,
}

impl NotificationDispatcher {
    pub fn new(templates: Arc<dyn TemplateRepository>, renderer: TemplateRenderer) -> Self {
        Self {
            channels: Vec::new(),
            templates,
            renderer,
        }
    }

    /// 默认模板 + 四个默认渠道，渲染使用宽松模式
    pub fn with_defaults() -> Self {
        let mut dispatcher = Self::new(
            Arc::new(InMemoryTemplateRepository::with_defaults()),
            TemplateRenderer::lenient(),
        );
        dispatcher.register_channel(Arc::new(InAppChannel::with_defaults()));
        dispatcher.register_channel(Arc::new(EmailChannel::with_defaults()));
        dispatcher.register_channel(Arc::new(PushChannel::with_defaults()));
        dispatcher.register_channel(Arc::new(HistoryChannel::with_defaults()));
        dispatcher
    }

    /// 注册渠道，同类型渠道后注册的覆盖先注册的
    pub fn register_channel(&mut self, channel: Arc<dyn NotificationChannel>) {
        info!(
            channel = %channel.channel(),
            channel_name = channel.name(),
            "注册通知渠道"
        );
        self.channels.retain(|c| c.channel() != channel.channel());
        self.channels.push(channel);
    }

    pub fn get_channel(&self, channel: Channel) -> Option<&Arc<dyn NotificationChannel>> {
        self.channels.iter().find(|c| c.channel() == channel)
    }

    pub fn registered_channels(&self) -> Vec<Channel> {
        self.channels.iter().map(|c| c.channel()).collect()
    }

    pub fn templates(&self) -> &Arc<dyn TemplateRepository> {
        &self.templates
    }

    /// 根据事件类型名和载荷包构造事件并分发
    pub async fn dispatch_bundle(
        &self,
        event_type: EventType,
        bundle: PayloadBundle,
        ctx: EventContext,
        recipients: &[Recipient],
    ) -> Result<DispatchReport> {
        let event = AppEvent::from_bundle(event_type, bundle, ctx)?;
        self.dispatch(&event, recipients).await
    }

    /// 分发事件
    #[instrument(
        skip(self, event, recipients),
        fields(event_type = %event.event_type(), recipients = recipients.len())
    )]
    pub async fn dispatch(&self, event: &AppEvent, recipients: &[Recipient]) -> Result<DispatchReport> {
        let start = Instant::now();
        let event_type = event.event_type();

        let email = self.render_email(event, recipients).await?;
        let (deliveries, mut results) = self.plan(event, recipients, email.as_ref());

        debug!(deliveries = deliveries.len(), "开始投递");

        let futures: Vec<_> = deliveries
            .iter()
            .map(|delivery| self.deliver(delivery))
            .collect();
        results.extend(join_all(futures).await);

        for result in &results {
            metrics::record_delivery(result.channel.as_str(), result.status.as_str());
        }

        let elapsed = start.elapsed();
        metrics::record_dispatch(event_type.as_str(), elapsed.as_secs_f64());

        let report = DispatchReport::new(event_type, results, elapsed.as_millis() as u64);
        self.log_report(&report);
        Ok(report)
    }

    /// 只有存在可收邮件的接收人时才解析和渲染模板
    async fn render_email(
        &self,
        event: &AppEvent,
        recipients: &[Recipient],
    ) -> Result<Option<EmailPayload>> {
        let Some(name) = event.email_template_name() else {
            return Ok(None);
        };
        if !recipients
            .iter()
            .any(|r| r.email.is_some() && accepts_email(event.internal_type(), r))
        {
            return Ok(None);
        }

        let template = resolve_template(self.templates.as_ref(), name, event.community()).await?;
        event
            .email(&self.renderer, &template.template)
            .inspect_err(|e| {
                metrics::record_render_failure(name);
                error!(template = name, error = %e, "邮件模板渲染失败");
            })
    }

    /// 生成投递计划，不满足条件的邮件直接记为跳过
    fn plan(
        &self,
        event: &AppEvent,
        recipients: &[Recipient],
        email: Option<&EmailPayload>,
    ) -> (Vec<Delivery>, Vec<ChannelResult>) {
        let event_type = event.event_type();
        let mut deliveries = Vec::new();
        let mut skipped = Vec::new();

        if let Some(line) = event.history() {
            deliveries.push(Delivery::new(event_type, None, DeliveryContent::History(line)));
        }

        for recipient in recipients {
            if let Some(user_id) = recipient.user_id.as_deref() {
                if let Some(notification) = event.app_notification(Some(user_id)) {
                    deliveries.push(Delivery::new(
                        event_type,
                        Some(recipient.clone()),
                        DeliveryContent::InApp(notification),
                    ));
                }
                if let Some(push) = event.push_notification() {
                    deliveries.push(Delivery::new(
                        event_type,
                        Some(recipient.clone()),
                        DeliveryContent::Push(push),
                    ));
                }
            }

            if event.email_template_name().is_none() || recipient.email.is_none() {
                continue;
            }
            if !accepts_email(event.internal_type(), recipient) {
                skipped.push(
                    ChannelResult::skipped(Channel::Email, "recipient opted out of community emails")
                        .for_recipient(Some(recipient.label())),
                );
            } else if let Some(payload) = email {
                deliveries.push(Delivery::new(
                    event_type,
                    Some(recipient.clone()),
                    DeliveryContent::Email(payload.clone()),
                ));
            }
        }

        (deliveries, skipped)
    }

    async fn deliver(&self, delivery: &Delivery) -> ChannelResult {
        let channel_type = delivery.channel();
        let recipient = delivery.recipient_label();

        let Some(channel) = self.get_channel(channel_type) else {
            warn!(channel = %channel_type, "渠道未注册，跳过投递");
            return ChannelResult::skipped(channel_type, "no channel registered")
                .for_recipient(recipient);
        };

        match channel.deliver(delivery).await {
            Ok(result) => result.for_recipient(recipient),
            Err(e) => {
                error!(
                    channel = %channel_type,
                    delivery_id = %delivery.delivery_id,
                    error = %e,
                    "渠道投递异常"
                );
                ChannelResult::failed(channel_type, e.to_string(), 0).for_recipient(recipient)
            }
        }
    }

    fn log_report(&self, report: &DispatchReport) {
        if report.success {
            info!(
                dispatch_id = %report.dispatch_id,
                delivered = report.success_count(),
                skipped = report.skipped_count(),
                duration_ms = report.duration_ms,
                "事件分发完成"
            );
        } else if report.is_partial_success() {
            warn!(
                dispatch_id = %report.dispatch_id,
                success_count = report.success_count(),
                failure_count = report.failure_count(),
                "事件部分分发成功"
            );
        } else {
            error!(
                dispatch_id = %report.dispatch_id,
                failure_count = report.failure_count(),
                "事件分发失败"
            );
        }
    }
}

/// 系统事件总是发送邮件，社区事件尊重接收人的退订设置
fn accepts_email(internal_type: InternalType, recipient: &Recipient) -> bool {
    internal_type == InternalType::System || recipient.receives_community_emails
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TestEvent;
    use crate::types::SendStatus;

    #[test]
    fn test_accepts_email() {
        let opted_out = Recipient::email_only("a@example.org").opted_out();
        assert!(accepts_email(InternalType::System, &opted_out));
        assert!(!accepts_email(InternalType::Community, &opted_out));
        assert!(accepts_email(
            InternalType::Community,
            &Recipient::email_only("a@example.org")
        ));
    }

    #[test]
    fn test_register_channel_replaces_same_type() {
        let mut dispatcher = NotificationDispatcher::with_defaults();
        assert_eq!(dispatcher.registered_channels().len(), 4);
        dispatcher.register_channel(Arc::new(PushChannel::with_defaults()));
        assert_eq!(dispatcher.registered_channels().len(), 4);
    }

    #[tokio::test]
    async fn test_missing_channel_is_skipped() {
        let dispatcher = NotificationDispatcher::new(
            Arc::new(InMemoryTemplateRepository::with_defaults()),
            TemplateRenderer::lenient(),
        );
        let event: AppEvent = TestEvent::default().into();
        let report = dispatcher
            .dispatch(&event, &[Recipient::user("u1")])
            .await
            .unwrap();

        assert_eq!(report.channel_results.len(), 1);
        assert_eq!(report.channel_results[0].status, SendStatus::Skipped);
        assert_eq!(report.channel_results[0].recipient.as_deref(), Some("u1"));
        assert!(report.success);
    }
}

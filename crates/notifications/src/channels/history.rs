//! 历史时间线渠道

use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::{ChannelConfig, NotificationChannel, unexpected_payload};
use crate::catalog::{Channel, EventType};
use crate::error::Result;
use crate::payload::HistoryLine;
use crate::types::{ChannelResult, Delivery, DeliveryContent};

/// 时间线中的一条记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub event_type: EventType,
    pub line: HistoryLine,
}

/// 历史时间线渠道
///
/// 每个事件最多写入一次，与接收人数量无关
pub struct HistoryChannel {
    config: ChannelConfig,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl HistoryChannel {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ChannelConfig::default())
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl NotificationChannel for HistoryChannel {
    fn channel(&self) -> Channel {
        Channel::History
    }

    fn name(&self) -> &str {
        "History"
    }

    async fn is_available(&self, delivery: &Delivery) -> bool {
        if !self.config.enabled {
            warn!(delivery_id = %delivery.delivery_id, "历史渠道已禁用");
            return false;
        }
        true
    }

    async fn deliver(&self, delivery: &Delivery) -> Result<ChannelResult> {
        let start = Instant::now();

        if !self.is_available(delivery).await {
            return Ok(ChannelResult::skipped(self.channel(), "channel disabled"));
        }

        let DeliveryContent::History(line) = &delivery.content else {
            return Err(unexpected_payload(self.channel(), delivery));
        };

        debug!(
            event_type = %delivery.event_type,
            username = %line.username,
            description = %line.description,
            "写入历史记录"
        );
        self.entries.lock().push(HistoryEntry {
            event_type: delivery.event_type,
            line: line.clone(),
        });

        Ok(ChannelResult::success(
            self.channel(),
            None,
            start.elapsed().as_millis() as u64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotificationError;
    use crate::payload::PushNotification;
    use crate::types::SendStatus;
    use chrono::Utc;

    #[tokio::test]
    async fn test_history_append() {
        let channel = HistoryChannel::with_defaults();
        let delivery = Delivery::new(
            EventType::DepositSubmitted,
            None,
            DeliveryContent::History(HistoryLine::new(Utc::now(), "John Doe", "Submitted.")),
        );

        let result = channel.deliver(&delivery).await.unwrap();
        assert_eq!(result.status, SendStatus::Success);

        let entries = channel.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event_type, EventType::DepositSubmitted);
        assert_eq!(entries[0].line.username, "John Doe");
    }

    #[tokio::test]
    async fn test_mismatched_payload_is_channel_error() {
        let channel = HistoryChannel::with_defaults();
        let delivery = Delivery::new(
            EventType::Test,
            None,
            DeliveryContent::Push(PushNotification::new("Test", "Test push")),
        );

        let err = channel.deliver(&delivery).await.unwrap_err();
        assert!(matches!(err, NotificationError::SendFailed { .. }));
        assert_eq!(
            err.to_string(),
            "notification send failed: channel=HISTORY, reason=unexpected PUSH payload"
        );
        assert!(channel.entries().is_empty());
    }
}

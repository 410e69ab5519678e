//! Orvium 通知分发
//!
//! 平台事件（投稿、评审、评审邀请、社区、消息）到用户通知的转换与投递。
//!
//! ## 核心功能
//!
//! - **事件目录**：20 种事件类型，各自声明内部分类、邮件模板与可达渠道
//! - **载荷生成**：每个事件按渠道生成站内通知、邮件、推送和历史记录
//! - **邮件模板**：Handlebars 渲染，付费社区可覆盖社区类模板
//! - **模板管理**：预览、保存前清洗与严格校验、重置
//! - **分发**：多渠道并发投递，单渠道失败不影响其他渠道
//!
//! ## 模块结构
//!
//! - `catalog`: 事件类型与渠道目录
//! - `event`: 事件结构体与 `AppEvent` 联合
//! - `template`: 模板渲染、存储与管理
//! - `channels`: 渠道 trait 与进程内实现
//! - `dispatch`: 分发器
//! - `bulk`: 批量操作

pub mod bulk;
pub mod catalog;
pub mod channels;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod links;
pub mod payload;
pub mod samples;
pub mod template;
pub mod types;

pub use bulk::{BulkFailure, BulkSummary, run_bulk};
pub use catalog::{Channel, ChannelSet, EventType, InternalType};
pub use channels::{
    ChannelConfig, EmailChannel, HistoryChannel, InAppChannel, NotificationChannel, PushChannel,
};
pub use dispatch::NotificationDispatcher;
pub use error::{NotificationError, Result};
pub use event::{AppEvent, EmailContent, NotificationEvent, PayloadBundle};
pub use links::{EventContext, SiteLinks};
pub use payload::{EmailPayload, HistoryLine, InAppNotification, PushAction, PushNotification};
pub use template::{
    EmailTemplate, EmailVariableSet, InMemoryTemplateRepository, TemplateRenderer,
    TemplateRepository, TemplateService,
};
pub use types::{ChannelResult, Delivery, DeliveryContent, DispatchReport, Recipient, SendStatus};

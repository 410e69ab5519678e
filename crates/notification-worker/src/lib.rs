//! 通知工作者
//!
//! 逐行读取 JSON 事件信封，校验后交给分发器投递到各渠道。
//! 单条信封失败只记入汇总，不影响后续信封。

pub mod consumer;
pub mod error;
pub mod setup;

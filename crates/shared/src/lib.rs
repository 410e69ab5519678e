//! 共享库
//!
//! 包含所有 Orvium 通知服务共用的配置、错误处理、可观测性初始化，
//! 以及事件载荷使用的只读领域快照模型。

pub mod config;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod observability;
pub mod test_utils;

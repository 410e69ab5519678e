//! 邮件模板
//!
//! - `renderer`：Handlebars 渲染，严格模式下缺失变量会报错
//! - `variables`：快照到占位符字典的转换
//! - `store`：模板模型、仓储与模板解析规则
//! - `service`：社区管理员的模板管理操作
//! - `sanitize` / `encoding`：保存前的 HTML 清洗与花括号编码

pub mod defaults;
pub mod encoding;
pub mod renderer;
pub mod sanitize;
pub mod service;
pub mod store;
pub mod variables;

pub use encoding::{decode_template_braces, encode_template_braces};
pub use renderer::{RendererConfig, TemplateRenderer};
pub use sanitize::sanitize_template;
pub use service::TemplateService;
pub use store::{EmailTemplate, InMemoryTemplateRepository, TemplateRepository, resolve_template};
pub use variables::EmailVariableSet;

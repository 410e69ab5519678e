//! 统一错误处理模块
//!
//! 定义共享层的错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 平台错误类型
#[derive(Debug, Error)]
pub enum PlatformError {
    // ==================== 配置错误 ====================
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid configuration: {field} - {message}")]
    InvalidConfig { field: String, message: String },
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, PlatformError>;

impl PlatformError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
        }
    }

    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = PlatformError::invalid_config("site.public_url", "must be an http(s) URL");
        assert_eq!(err.code(), "INVALID_CONFIG");
        assert_eq!(
            err.to_string(),
            "invalid configuration: site.public_url - must be an http(s) URL"
        );

        let err = PlatformError::from(config::ConfigError::NotFound("site".to_string()));
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}

//! 通知子系统错误类型
//!
//! 区分三类错误：
//! - 编程错误（模板与事件目录不匹配），直接失败；
//! - 调用方数据缺失（事件构造时缺少快照），以 not-found 形式上抛；
//! - 管理员编辑模板时的校验错误，以 bad-request 形式返回并指出具体变量。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("template {name} is not associated with any event")]
    TemplateNotAssociated { name: String },

    #[error("email template not found: {name}")]
    TemplateNotFound { name: String },

    #[error("required {entity} data is missing for event {event_type}")]
    MissingSnapshot {
        event_type: String,
        entity: &'static str,
    },

    #[error("variable {name} is not allowed in this template")]
    TemplateVariable { name: String },

    #[error("template compilation error: {0}")]
    TemplateCompilation(String),

    #[error("template {name} cannot be customized: {reason}")]
    CustomizationForbidden { name: String, reason: String },

    #[error("notification send failed: channel={channel}, reason={reason}")]
    SendFailed { channel: String, reason: String },
}

pub type Result<T> = std::result::Result<T, NotificationError>;

impl NotificationError {
    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TemplateNotAssociated { .. } => "TEMPLATE_NOT_ASSOCIATED",
            Self::TemplateNotFound { .. } => "TEMPLATE_NOT_FOUND",
            Self::MissingSnapshot { .. } => "MISSING_SNAPSHOT",
            Self::TemplateVariable { .. } => "TEMPLATE_VARIABLE_NOT_ALLOWED",
            Self::TemplateCompilation(_) => "TEMPLATE_COMPILATION_ERROR",
            Self::CustomizationForbidden { .. } => "TEMPLATE_CUSTOMIZATION_FORBIDDEN",
            Self::SendFailed { .. } => "SEND_FAILED",
        }
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self {
            Self::TemplateVariable { .. } | Self::TemplateCompilation(_) => 400,
            Self::CustomizationForbidden { .. } => 403,
            Self::TemplateNotFound { .. } | Self::MissingSnapshot { .. } => 404,
            Self::SendFailed { .. } => 502,
            Self::TemplateNotAssociated { .. } => 500,
        }
    }

    /// 是否为调用方输入错误（对应 BadRequest）
    pub fn is_bad_request(&self) -> bool {
        self.http_status() == 400
    }

    /// 是否为数据缺失（对应 NotFound）
    pub fn is_not_found(&self) -> bool {
        self.http_status() == 404
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NotificationError::TemplateNotAssociated {
            name: "unknown-template".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "template unknown-template is not associated with any event"
        );

        let err = NotificationError::TemplateVariable {
            name: "undefinedVar".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "variable undefinedVar is not allowed in this template"
        );

        let err = NotificationError::SendFailed {
            channel: "EMAIL".to_string(),
            reason: "timeout".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "notification send failed: channel=EMAIL, reason=timeout"
        );
    }

    #[test]
    fn test_error_classification() {
        let variable = NotificationError::TemplateVariable {
            name: "X".to_string(),
        };
        assert!(variable.is_bad_request());
        assert_eq!(variable.error_code(), "TEMPLATE_VARIABLE_NOT_ALLOWED");

        let missing = NotificationError::MissingSnapshot {
            event_type: "DEPOSIT_PUBLISHED".to_string(),
            entity: "deposit",
        };
        assert!(missing.is_not_found());
        assert!(!missing.is_bad_request());

        let associated = NotificationError::TemplateNotAssociated {
            name: "x".to_string(),
        };
        assert_eq!(associated.http_status(), 500);
    }

    #[test]
    fn test_send_failed_is_upstream_error() {
        let err = NotificationError::SendFailed {
            channel: "PUSH".to_string(),
            reason: "unexpected EMAIL payload".to_string(),
        };
        assert_eq!(err.error_code(), "SEND_FAILED");
        assert_eq!(err.http_status(), 502);
        assert!(!err.is_bad_request());
    }
}

use thiserror::Error;

/// 统一的 Relay 错误定义
/// 使用 `thiserror` 宏自动生成 Display 和 Error trait
///
/// `Upstream` 与 `MalformedResponse` 刻意分开：前者是硬失败（对外 5xx），
/// 后者只在反向分析里出现，调用方必须降级处理而不是上抛。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    // =================================================================
    // 1. 输入校验类 (Validation) -> 400
    // =================================================================
    #[error("{0}")]
    Validation(String),

    // =================================================================
    // 2. 配置类 (Config) -> 500，邮件路径为软失败
    // =================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    // =================================================================
    // 3. 外部服务类 (Upstream)
    // 注意：Core 不直接依赖 reqwest，用 String 包装错误信息
    // =================================================================
    #[error("Completion service error: {0}")]
    Upstream(String),

    /// 上游返回 2xx，但没有可用的文本（无 choices / content 为 null 或空白）
    #[error("Completion service error: empty completion content")]
    EmptyCompletion,

    #[error("Template not found for model: {0}")]
    TemplateNotFound(String),

    // =================================================================
    // 4. 数据解析类 (Data) - 不对外暴露
    // =================================================================
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

impl RelayError {
    /// 是否属于调用方输入错误
    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::Validation(_))
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_cause_text() {
        let err = RelayError::TemplateNotFound("sora".into());
        assert_eq!(err.to_string(), "Template not found for model: sora");

        let err = RelayError::Upstream("status 502".into());
        assert_eq!(err.to_string(), "Completion service error: status 502");

        assert_eq!(
            RelayError::EmptyCompletion.to_string(),
            "Completion service error: empty completion content"
        );
    }

    #[test]
    fn only_validation_is_client_error() {
        assert!(RelayError::Validation("x".into()).is_client_error());
        assert!(!RelayError::Configuration("x".into()).is_client_error());
        assert!(!RelayError::Upstream("x".into()).is_client_error());
        assert!(!RelayError::EmptyCompletion.is_client_error());
    }

    #[test]
    fn json_error_maps_to_malformed() {
        let err: RelayError = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, RelayError::MalformedResponse(_)));
    }
}

use serde::{Deserialize, Serialize};

/// `/send-email` 请求体
///
/// 字段缺失时反序列化为空串，由 `BrevoMailer::send` 统一给出软失败
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailRequest {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// `/send-email` 响应体，失败也以 200 + success=false 返回
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmailResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_omits_error() {
        let json = serde_json::to_value(EmailResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"success": true}));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let req: EmailRequest = serde_json::from_str(r#"{"to": "a@b.c"}"#).unwrap();
        assert_eq!(req.to, "a@b.c");
        assert!(req.subject.is_empty() && req.html.is_empty());
    }
}

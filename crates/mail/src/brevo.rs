use crate::config::MailConfig;
use crate::types::{EmailRequest, EmailResponse};
use reqwest::header;
use serde_json::json;
use std::time::Duration;

/// Brevo (SMTP API) 邮件发送客户端
///
/// 密钥在每次发送时从环境变量读取：缺失只会让 `/send-email` 返回软失败，
/// 不影响进程启动和其它接口。
#[derive(Clone)]
pub struct BrevoMailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl BrevoMailer {
    pub fn new(config: MailConfig) -> Self {
        // builder 只在 TLS 后端初始化失败时报错，此时退回默认客户端
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    fn api_key(&self) -> Option<String> {
        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    /// 发送一封邮件，所有失败都体现在返回值里，不会返回 Err
    pub async fn send(&self, request: &EmailRequest) -> EmailResponse {
        // 1. 检查密钥
        let Some(api_key) = self.api_key() else {
            tracing::warn!("{} is not configured, email not sent", self.config.api_key_env);
            return EmailResponse::failed(format!("Missing {}", self.config.api_key_env));
        };

        // 2. 校验字段
        if request.to.trim().is_empty()
            || request.subject.trim().is_empty()
            || request.html.trim().is_empty()
        {
            return EmailResponse::failed("Missing required fields: to, subject, html");
        }

        // 3. 构建请求 Body
        let body = json!({
            "sender": { "name": self.config.sender_name, "email": self.config.sender_email },
            "to": [{ "email": request.to.trim() }],
            "subject": request.subject,
            "htmlContent": request.html,
        });

        let mut key_header = match header::HeaderValue::from_str(&api_key) {
            Ok(v) => v,
            Err(_) => {
                return EmailResponse::failed(format!(
                    "{} contains invalid header characters",
                    self.config.api_key_env
                ))
            }
        };
        // 标记为敏感信息，日志中不打印
        key_header.set_sensitive(true);

        // 4. 发送
        let url = format!("{}/smtp/email", self.config.base_url.trim_end_matches('/'));
        let res = self
            .client
            .post(&url)
            .header("api-key", key_header)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await;

        // 5. 处理结果
        match res {
            Ok(res) if res.status().is_success() => {
                tracing::info!("📧 Email sent to {}", request.to.trim());
                EmailResponse::ok()
            }
            Ok(res) => {
                let status = res.status();
                let error_text = res.text().await.unwrap_or_default();
                tracing::error!("Brevo error: status {}, body: {}", status, error_text);
                EmailResponse::failed(format!("Failed to send email (status {})", status.as_u16()))
            }
            Err(e) => {
                tracing::error!("Brevo request failed: {}", e);
                EmailResponse::failed(format!("Failed to send email: {}", e))
            }
        }
    }
}

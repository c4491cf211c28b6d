use serde::Deserialize;

/// --- 邮件服务配置 ---
/// API Key 只从环境变量读取，这里只记录变量名
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub base_url: String,
    pub api_key_env: String,
    pub sender_name: String,
    pub sender_email: String,
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.brevo.com/v3".to_string(),
            api_key_env: "BREVO_API_KEY".to_string(),
            sender_name: "AI Runner 2033".to_string(),
            sender_email: "robert@airunner2033.com".to_string(),
            timeout_secs: 30,
        }
    }
}

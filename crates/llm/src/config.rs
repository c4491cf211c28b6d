use serde::Deserialize;

/// --- 补全服务配置 ---
/// 默认对接 Groq 的 OpenAI 兼容接口 (llama-3.1-8b-instant)
/// 所有字段都有默认值，`relay.toml` / 环境变量只需覆盖想改的部分
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// 例如 https://api.groq.com/openai/v1 ，会在后面拼接 /chat/completions
    pub base_url: String,
    pub model: String,
    /// 存放 API Key 的环境变量名（密钥本身不进配置文件）
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// `/optimize` 使用的采样温度
    pub temperature: f32,
    /// `/optimize` 使用的最大 token 数
    pub max_tokens: Option<u32>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_secs: 60,
            temperature: 0.7,
            max_tokens: Some(2000),
        }
    }
}

/// --- 模板配置 ---
/// `dir` 为空时使用编译期打包进二进制的模板 (templates/*.txt)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub dir: Option<String>,
}

use super::{ChatMessage, CompletionBackend, ComposedPrompt, GenerationParams};
use crate::clean::clean_completion;
use crate::config::CompletionConfig;
use async_trait::async_trait;
use relay_core::RelayError;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ==========================================
// 1. 请求 / 响应结构体 (OpenAI 兼容格式)
// ==========================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    // 对应 JSON 中的 "choices"
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    // content 可能是 null
    content: Option<String>,
}

// ==========================================
// 2. 实现 Groq Backend
// ==========================================

/// Groq (OpenAI 兼容) 补全客户端
///
/// 构造之后不可变，内部的 `reqwest::Client` 自带连接池，可以被并发请求安全复用。
#[derive(Clone)]
pub struct GroqBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl GroqBackend {
    /// 使用显式传入的 API Key 创建实例
    pub fn new(api_key: &str, config: &CompletionConfig) -> Result<Self, RelayError> {
        let mut headers = header::HeaderMap::new();
        // Groq 使用 Bearer Token 鉴权
        let mut auth_value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| {
                RelayError::Configuration(format!(
                    "{} contains invalid header characters",
                    config.api_key_env
                ))
            })?;
        // 标记为敏感信息，日志中不打印
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RelayError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
        })
    }

    /// 真正的网络调用，运行在独立的 tokio task 中
    async fn send(
        client: reqwest::Client,
        endpoint: String,
        model: String,
        messages: Vec<ChatMessage>,
        params: GenerationParams,
    ) -> Result<String, RelayError> {
        let body = ChatRequest {
            model: &model,
            messages: &messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        // 1. 发送请求
        let res = client
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Upstream(format!("request failed: {}", e)))?;

        // 2. 检查 HTTP 状态码
        if !res.status().is_success() {
            let status = res.status();
            let error_text = res.text().await.unwrap_or_default();
            return Err(RelayError::Upstream(format!(
                "status {}, body: {}",
                status, error_text
            )));
        }

        // 3. 解析 JSON 响应
        let data: ChatResponse = res
            .json()
            .await
            .map_err(|e| RelayError::Upstream(format!("invalid response body: {}", e)))?;

        // 4. 提取文本内容
        // 路径: choices[0] -> message -> content
        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(RelayError::EmptyCompletion);
        }

        Ok(clean_completion(&content))
    }
}

#[async_trait]
impl CompletionBackend for GroqBackend {
    async fn complete(
        &self,
        prompt: ComposedPrompt,
        params: GenerationParams,
    ) -> Result<String, RelayError> {
        tracing::debug!(
            "Sending request to completion model: {} ({} chars, temperature={})",
            self.model,
            prompt.text().chars().count(),
            params.temperature
        );
        let messages = prompt.into_messages();

        // 放到独立 task 上执行：慢请求不会拖住其它请求，
        // 调用方提前断开时这次上游调用也会照常跑完
        let handle = tokio::spawn(Self::send(
            self.client.clone(),
            self.endpoint.clone(),
            self.model.clone(),
            messages,
            params,
        ));

        handle
            .await
            .map_err(|e| RelayError::Upstream(format!("completion task failed: {}", e)))?
    }
}

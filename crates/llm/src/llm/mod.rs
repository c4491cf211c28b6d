use async_trait::async_trait;
use relay_core::RelayError;
use serde::{Deserialize, Serialize};

pub mod groq;
pub mod lazy;

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// 一条带角色的对话消息，字段与 OpenAI 兼容接口一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// 发给补全服务的完整 Prompt
///
/// * `Text` - 模板与用户输入拼接后的一整段文本，作为单条 user 消息发送
/// * `Chat` - 已经按角色拆好的消息序列 (system + user)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposedPrompt {
    Text(String),
    Chat(Vec<ChatMessage>),
}

impl ComposedPrompt {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        match self {
            ComposedPrompt::Text(text) => vec![ChatMessage::user(text)],
            ComposedPrompt::Chat(messages) => messages,
        }
    }

    /// 所有消息内容拼在一起，用于调试日志和测试断言
    pub fn text(&self) -> String {
        match self {
            ComposedPrompt::Text(text) => text.clone(),
            ComposedPrompt::Chat(messages) => messages
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// 生成参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// 采样温度，构造时被钳制在 [0, 1]
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl GenerationParams {
    pub fn new(temperature: f32, max_tokens: Option<u32>) -> Self {
        let temperature = if temperature.is_nan() {
            0.0
        } else {
            temperature.clamp(0.0, 1.0)
        };
        Self {
            temperature,
            max_tokens,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::new(0.7, Some(2000))
    }
}

/// 补全服务抽象接口 (CompletionBackend)
///
/// 该 Trait 定义了与远端大语言模型补全服务交互的通用行为。
///
/// # 线程安全
/// 该 Trait 继承了 `Send + Sync`，实现者会以 `Arc<dyn CompletionBackend>` 的形式
/// 放进 axum 的 State 里，被所有请求并发共享。
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// 执行一次补全请求
    ///
    /// # 返回值 (Returns)
    ///
    /// * `Ok(String)` - 第一个 choice 的文本，已经去掉了代码围栏 (code fence)。
    /// * `Err(RelayError)` - `Configuration` 表示缺少密钥；`Upstream` 表示网络错误或
    ///   非 2xx 状态码；`EmptyCompletion` 表示上游没有给出任何文本。
    async fn complete(
        &self,
        prompt: ComposedPrompt,
        params: GenerationParams,
    ) -> Result<String, RelayError>;
}

use crate::llm::{ChatMessage, CompletionBackend, ComposedPrompt, GenerationParams};
use relay_core::RelayError;
use std::sync::Arc;

/// 站内聊天挂件使用的角色设定
const SYSTEM_PROMPT: &str = include_str!("../prompts/chat_system_prompt.md");

/// 上游没有给出任何文本时的兜底回复
pub const FALLBACK_REPLY: &str = "I had trouble generating a detailed answer just now, but the AI Runner cat is online. Please try asking again with a bit more detail.";

const CHAT_TEMPERATURE: f32 = 0.4;
const CHAT_MAX_TOKENS: u32 = 600;

/// 聊天请求
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    /// 消息来自哪个页面，缺省记为 "unknown"
    pub source: Option<String>,
}

/// 聊天适配器：固定角色设定 + 低温度，复用同一个补全网关
#[derive(Clone)]
pub struct ChatAssistant {
    backend: Arc<dyn CompletionBackend>,
}

impl ChatAssistant {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub fn params() -> GenerationParams {
        GenerationParams::new(CHAT_TEMPERATURE, Some(CHAT_MAX_TOKENS))
    }

    pub fn build_prompt(request: &ChatRequest) -> ComposedPrompt {
        let source = request
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("unknown");

        ComposedPrompt::Chat(vec![
            ChatMessage::system(SYSTEM_PROMPT.trim()),
            ChatMessage::user(format!(
                "User is chatting via the floating holographic cat widget on the AI Runner 2033 site. Source: {}. Message: {}",
                source, request.message
            )),
        ])
    }

    /// 生成一条回复
    ///
    /// 上游成功但内容为空时返回兜底文案；其它失败照常上抛。
    pub async fn reply(&self, request: &ChatRequest) -> Result<String, RelayError> {
        let prompt = Self::build_prompt(request);

        match self.backend.complete(prompt, Self::params()).await {
            Ok(reply) => Ok(reply),
            Err(RelayError::EmptyCompletion) => {
                tracing::warn!("Chat completion was empty, sending fallback reply");
                Ok(FALLBACK_REPLY.to_string())
            }
            Err(e) => Err(e),
        }
    }
}

use crate::llm::{ChatMessage, CompletionBackend, ComposedPrompt, GenerationParams};
use relay_core::RelayError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// 编译时加载的系统提示词，要求模型只输出带 5 个字段的 JSON
const SYSTEM_PROMPT: &str = include_str!("../prompts/reverse_system_prompt.md");

const USER_PREFIX: &str =
    "Analyze the provided content and respond only with JSON. Here is the analysis request: ";

/// 反向分析请求参数
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseRequest {
    /// image / site / video / article
    pub mode: String,
    pub target: String,
    pub notes: Option<String>,
    /// 0-100，越界会被钳制
    pub creativity: i64,
    /// 0-100
    pub depth: i64,
    /// relaxed / balanced / strict
    pub detect_ai: String,
}

/// 反向分析结果
///
/// 所有字段都有兜底值；上游返回的内容无法解析时，原文放进 `extra_notes`。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReverseAnalysisResult {
    pub reconstructed_prompt: String,
    pub style_breakdown: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub ai_probability: Option<f64>,
    pub extra_notes: Option<String>,
}

impl ReverseAnalysisResult {
    /// 降级结果：结构化字段全部为空，原始文本原样放进 extra_notes
    pub fn degraded(raw: &str) -> Self {
        Self {
            extra_notes: Some(raw.to_string()),
            ..Self::default()
        }
    }

    /// 从任意 JSON 对象中逐字段做防御性提取
    pub fn from_value(value: &Value) -> Self {
        Self {
            reconstructed_prompt: value
                .get("reconstructed_prompt")
                .map(stringify)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            style_breakdown: non_blank(value.get("style_breakdown")),
            tech_stack: match value.get("tech_stack") {
                Some(Value::Array(items)) => Some(items.iter().map(stringify).collect()),
                _ => None,
            },
            ai_probability: value.get("ai_probability").and_then(probability),
            extra_notes: non_blank(value.get("extra_notes")),
        }
    }

    /// 解析补全文本；JSON 不合法时降级，而不是返回错误
    pub fn from_completion(raw: &str) -> Self {
        match parse_analysis(raw) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::warn!("Reverse analysis degraded to raw text: {}", e);
                Self::degraded(raw)
            }
        }
    }
}

/// 把补全文本解析为 JSON 对象
///
/// 非 JSON 或顶层不是对象都算 `MalformedResponse`。
pub fn parse_analysis(raw: &str) -> Result<Value, RelayError> {
    let value: Value = serde_json::from_str(raw.trim())?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(RelayError::MalformedResponse(
            "top-level JSON value is not an object".to_string(),
        ))
    }
}

/// creativity (0-100) 线性映射到采样温度，结果钳制在 [0.1, 1.0]
pub fn creativity_to_temperature(creativity: i64) -> f32 {
    (creativity as f32 / 100.0).clamp(0.1, 1.0)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .map(stringify)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn probability(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then(|| number.clamp(0.0, 1.0))
}

/// 反向分析适配器：复用补全网关，换一套系统提示词
#[derive(Clone)]
pub struct ReverseAnalyzer {
    backend: Arc<dyn CompletionBackend>,
}

impl ReverseAnalyzer {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// 构建 system + user 两条消息
    pub fn build_prompt(request: &ReverseRequest) -> ComposedPrompt {
        let instructions = json!({
            "mode": request.mode,
            "target": request.target,
            "notes": request.notes.clone().unwrap_or_default(),
            "creativity": request.creativity,
            "analysis_depth": request.depth,
            "detect_ai_mode": request.detect_ai,
        });

        ComposedPrompt::Chat(vec![
            ChatMessage::system(SYSTEM_PROMPT.trim()),
            ChatMessage::user(format!("{}{}", USER_PREFIX, instructions)),
        ])
    }

    /// 执行反向分析
    ///
    /// 上游失败返回 `Upstream`/`Configuration`；上游内容不是 JSON 时降级，不报错。
    pub async fn analyze(
        &self,
        request: &ReverseRequest,
    ) -> Result<ReverseAnalysisResult, RelayError> {
        let params = GenerationParams::new(creativity_to_temperature(request.creativity), None);
        let prompt = Self::build_prompt(request);

        tracing::debug!(
            "Reverse analysis: mode={}, temperature={}",
            request.mode,
            params.temperature
        );
        let raw = self.backend.complete(prompt, params).await?;

        Ok(ReverseAnalysisResult::from_completion(&raw))
    }
}

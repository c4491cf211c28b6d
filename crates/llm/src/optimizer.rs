use crate::llm::{CompletionBackend, GenerationParams};
use crate::template::{compose, TemplateSource};
use relay_core::{RelayError, SupportedModel};
use std::sync::Arc;

/// Prompt 优化器：模板解析 + 补全调用
///
/// 本身无状态，持有的都是只读的共享句柄，可以直接 clone 到各个请求里。
#[derive(Clone)]
pub struct PromptOptimizer {
    templates: Arc<dyn TemplateSource>,
    backend: Arc<dyn CompletionBackend>,
    params: GenerationParams,
}

impl PromptOptimizer {
    pub fn new(
        templates: Arc<dyn TemplateSource>,
        backend: Arc<dyn CompletionBackend>,
        params: GenerationParams,
    ) -> Self {
        Self {
            templates,
            backend,
            params,
        }
    }

    /// 为指定模型优化一段 Prompt
    ///
    /// 调用方负责校验 prompt 非空；这里只做 模板 -> 拼接 -> 补全。
    pub async fn optimize(
        &self,
        model: SupportedModel,
        prompt: &str,
    ) -> Result<String, RelayError> {
        // 1. 读取模板
        let template = self.templates.load(model.id()).await?;

        // 2. 拼接
        let composed = compose(&template, prompt);

        // 3. 调用补全服务 (返回值已清洗)
        tracing::debug!("Optimizing prompt for model {}", model);
        self.backend.complete(composed, self.params).await
    }
}

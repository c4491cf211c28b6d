use crate::settings::Settings;
use relay_llm::llm::lazy::LazyCompletionClient;
use relay_llm::{template, template::TemplateSource};
use relay_llm::{
    ChatAssistant, CompletionBackend, GenerationParams, PromptOptimizer, ReverseAnalyzer,
};
use relay_mail::BrevoMailer;
use std::sync::Arc;

/// 所有请求共享的只读状态
///
/// 补全客户端只有一个实例（延迟初始化），通过 State 显式注入到各个 handler。
#[derive(Clone)]
pub struct AppState {
    pub service_name: Arc<str>,
    pub optimizer: PromptOptimizer,
    pub analyzer: ReverseAnalyzer,
    pub assistant: ChatAssistant,
    pub mailer: BrevoMailer,
}

impl AppState {
    pub fn new(
        service_name: &str,
        templates: Arc<dyn TemplateSource>,
        backend: Arc<dyn CompletionBackend>,
        mailer: BrevoMailer,
        optimize_params: GenerationParams,
    ) -> Self {
        Self {
            service_name: Arc::from(service_name),
            optimizer: PromptOptimizer::new(templates, backend.clone(), optimize_params),
            analyzer: ReverseAnalyzer::new(backend.clone()),
            assistant: ChatAssistant::new(backend),
            mailer,
        }
    }

    /// 按配置组装：Groq 客户端延迟初始化，启动时不要求密钥存在
    pub fn from_settings(settings: &Settings) -> Self {
        let backend: Arc<dyn CompletionBackend> =
            Arc::new(LazyCompletionClient::new(settings.completion.clone()));
        let params = GenerationParams::new(
            settings.completion.temperature,
            settings.completion.max_tokens,
        );

        Self::new(
            &settings.service_name,
            template::from_config(&settings.templates),
            backend,
            BrevoMailer::new(settings.mail.clone()),
            params,
        )
    }
}

use super::groq::GroqBackend;
use super::{CompletionBackend, ComposedPrompt, GenerationParams};
use crate::config::CompletionConfig;
use async_trait::async_trait;
use relay_core::RelayError;
use tokio::sync::OnceCell;

/// 延迟初始化的补全客户端
///
/// 进程启动时不读取密钥；第一次真正调用时才从环境变量解析 API Key 并构建
/// `GroqBackend`。并发首次调用时只有一个构建会生效，之后所有调用者拿到同一个实例。
/// 密钥缺失时不会缓存失败结果，每一次调用都会返回 `Configuration` 错误。
pub struct LazyCompletionClient {
    config: CompletionConfig,
    cell: OnceCell<GroqBackend>,
}

impl LazyCompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            config,
            cell: OnceCell::new(),
        }
    }

    /// 是否已经构建过客户端
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    async fn backend(&self) -> Result<&GroqBackend, RelayError> {
        self.cell
            .get_or_try_init(|| async {
                let api_key = std::env::var(&self.config.api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| {
                        RelayError::Configuration(format!(
                            "{} is not configured",
                            self.config.api_key_env
                        ))
                    })?;

                tracing::info!(
                    "Initializing completion client (model={}, base_url={})",
                    self.config.model,
                    self.config.base_url
                );
                GroqBackend::new(&api_key, &self.config)
            })
            .await
    }
}

#[async_trait]
impl CompletionBackend for LazyCompletionClient {
    async fn complete(
        &self,
        prompt: ComposedPrompt,
        params: GenerationParams,
    ) -> Result<String, RelayError> {
        self.backend().await?.complete(prompt, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_env(var: &str) -> CompletionConfig {
        CompletionConfig {
            api_key_env: var.to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            ..CompletionConfig::default()
        }
    }

    #[tokio::test]
    async fn missing_key_fails_every_call_without_panicking() {
        let client = LazyCompletionClient::new(config_with_env("RELAY_TEST_KEY_THAT_IS_NEVER_SET"));

        for _ in 0..2 {
            let err = client
                .complete(ComposedPrompt::Text("hi".into()), GenerationParams::default())
                .await
                .unwrap_err();
            assert_eq!(
                err,
                RelayError::Configuration(
                    "RELAY_TEST_KEY_THAT_IS_NEVER_SET is not configured".into()
                )
            );
        }
        assert!(!client.is_initialized());
    }
}

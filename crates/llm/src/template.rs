use crate::config::TemplateConfig;
use crate::llm::ComposedPrompt;
use async_trait::async_trait;
use relay_core::{RelayError, SupportedModel};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// 模板来源接口
///
/// 根据模型标识返回对应的指令模板（已去掉首尾空白）。
/// 不负责校验模型是否在支持列表里，但未知标识必须返回 `TemplateNotFound`，不能静默给空串。
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn load(&self, model: &str) -> Result<String, RelayError>;
}

/// 内存中的模板表
pub struct InMemoryTemplates {
    templates: HashMap<String, String>,
}

impl InMemoryTemplates {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            templates: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 编译时加载 crates/llm/templates/ 下的模板文件，每个支持的模型一份
    pub fn bundled() -> Self {
        Self::new(SupportedModel::all().into_iter().map(|m| (m.id(), bundled_text(m))))
    }
}

fn bundled_text(model: SupportedModel) -> &'static str {
    match model {
        SupportedModel::Chatgpt => include_str!("../templates/chatgpt.txt"),
        SupportedModel::Cursor => include_str!("../templates/cursor.txt"),
        SupportedModel::Midjourney => include_str!("../templates/midjourney.txt"),
        SupportedModel::Leonardo => include_str!("../templates/leonardo.txt"),
        SupportedModel::Sora => include_str!("../templates/sora.txt"),
        SupportedModel::Veo => include_str!("../templates/veo.txt"),
    }
}

#[async_trait]
impl TemplateSource for InMemoryTemplates {
    async fn load(&self, model: &str) -> Result<String, RelayError> {
        self.templates
            .get(model)
            .map(|t| t.trim().to_string())
            .ok_or_else(|| RelayError::TemplateNotFound(model.to_string()))
    }
}

/// 从目录读取 `<dir>/<model>.txt`
///
/// 每次调用都完整读取文件，不做缓存；部署时替换文件即可生效。
pub struct DirTemplates {
    root_dir: PathBuf,
}

impl DirTemplates {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: path.into(),
        }
    }
}

#[async_trait]
impl TemplateSource for DirTemplates {
    async fn load(&self, model: &str) -> Result<String, RelayError> {
        // 标识只能是单个文件名，防止 ../ 之类的路径穿越
        if model.is_empty()
            || model.contains(['/', '\\'])
            || model.contains("..")
        {
            return Err(RelayError::TemplateNotFound(model.to_string()));
        }

        let file_path = self.root_dir.join(format!("{}.txt", model));
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Ok(content.trim().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RelayError::TemplateNotFound(model.to_string()))
            }
            Err(e) => {
                tracing::warn!("Failed to read template {}: {}", file_path.display(), e);
                Err(RelayError::TemplateNotFound(format!("{} ({})", model, e)))
            }
        }
    }
}

/// 根据配置选择模板来源：配置了目录就读目录，否则用打包的模板
pub fn from_config(config: &TemplateConfig) -> Arc<dyn TemplateSource> {
    match config.dir.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(dir) => {
            tracing::info!("Loading prompt templates from {}", dir);
            Arc::new(DirTemplates::new(dir))
        }
        None => Arc::new(InMemoryTemplates::bundled()),
    }
}

/// 把模板和用户输入拼成最终 Prompt
///
/// 模板原样保留，用户输入不做截断也不做 trim。
pub fn compose(template: &str, user_prompt: &str) -> ComposedPrompt {
    ComposedPrompt::Text(format!("{}\n\nUSER PROMPT:\n{}", template, user_prompt))
}

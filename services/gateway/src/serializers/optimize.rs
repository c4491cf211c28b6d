use relay_core::{ensure_not_blank, RelayError, SupportedModel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OptimizeIn {
    pub model: String,
    pub prompt: String,
}

impl OptimizeIn {
    /// 先校验模型，再校验 prompt；任何一项不通过都不会触发上游调用
    pub fn validate(&self) -> Result<SupportedModel, RelayError> {
        let model = SupportedModel::parse(&self.model)?;
        ensure_not_blank!(self.prompt, "Prompt cannot be empty");
        Ok(model)
    }
}

#[derive(Debug, Serialize)]
pub struct OptimizeOut {
    pub optimized_prompt: String,
}

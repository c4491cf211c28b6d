// crates/core/src/model.rs
use crate::error::RelayError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// 支持优化的目标模型
///
/// 顺序即 `GET /` 中 `supported_models` 的顺序。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")] // 序列化为 "chatgpt", "midjourney"
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SupportedModel {
    Chatgpt,
    Cursor,
    Midjourney,
    Leonardo,
    Sora,
    Veo,
}

impl SupportedModel {
    /// 小写的规范标识，同时也是模板资源的 key
    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn all() -> Vec<SupportedModel> {
        SupportedModel::iter().collect()
    }

    pub fn ids() -> Vec<&'static str> {
        SupportedModel::iter().map(SupportedModel::id).collect()
    }

    /// 解析外部传入的模型名，失败时给出可读的错误（包含允许列表）
    ///
    /// 只忽略大小写，不去除空白：`" veo "` 不是合法的模型名。
    pub fn parse(raw: &str) -> Result<Self, RelayError> {
        SupportedModel::from_str(raw).map_err(|_| {
            RelayError::Validation(format!(
                "Model '{}' is not supported. Supported models: {}",
                raw,
                SupportedModel::ids().join(", ")
            ))
        })
    }
}

use relay_core::{ensure_not_blank, RelayError};
use relay_llm::ChatRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatIn {
    pub message: String,
    pub source: Option<String>,
}

impl ChatIn {
    pub fn into_request(self) -> Result<ChatRequest, RelayError> {
        ensure_not_blank!(self.message, "Missing message");

        Ok(ChatRequest {
            message: self.message,
            source: self.source,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ChatOut {
    pub reply: String,
}

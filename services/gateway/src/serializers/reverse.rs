use relay_core::{ensure_not_blank, RelayError};
use relay_llm::ReverseRequest;
use serde::Deserialize;

fn default_creativity() -> i64 {
    40
}

fn default_depth() -> i64 {
    70
}

fn default_detect_ai() -> String {
    "balanced".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ReverseIn {
    pub mode: String,
    pub target: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_creativity")]
    pub creativity: i64,
    #[serde(default = "default_depth")]
    pub depth: i64,
    #[serde(default = "default_detect_ai")]
    pub detect_ai: String,
}

impl ReverseIn {
    pub fn into_request(self) -> Result<ReverseRequest, RelayError> {
        ensure_not_blank!(self.target, "Target content cannot be empty");

        Ok(ReverseRequest {
            mode: self.mode.trim().to_string(),
            target: self.target,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            creativity: self.creativity,
            depth: self.depth,
            detect_ai: self.detect_ai,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let req: ReverseIn =
            serde_json::from_str(r#"{"mode": "site", "target": "https://example.com"}"#).unwrap();
        let req = req.into_request().unwrap();
        assert_eq!(req.creativity, 40);
        assert_eq!(req.depth, 70);
        assert_eq!(req.detect_ai, "balanced");
        assert_eq!(req.notes, None);
    }

    #[test]
    fn blank_target_is_rejected() {
        let req: ReverseIn =
            serde_json::from_str(r#"{"mode": "image", "target": " \n "}"#).unwrap();
        assert_eq!(
            req.into_request().unwrap_err(),
            RelayError::Validation("Target content cannot be empty".into())
        );
    }
}

use serde::Serialize;

#[derive(Serialize)]
pub struct HealthOut {
    pub status: &'static str,
    pub service: String,
    pub supported_models: Vec<&'static str>,
}

use crate::serializers::health::HealthOut;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use relay_core::SupportedModel;

pub async fn health(State(state): State<AppState>) -> Json<HealthOut> {
    Json(HealthOut {
        status: "ok",
        service: state.service_name.to_string(),
        supported_models: SupportedModel::ids(),
    })
}

use crate::error::ApiError;
use crate::serializers::reverse::ReverseIn;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use relay_llm::ReverseAnalysisResult;

pub async fn reverse_ai(
    State(state): State<AppState>,
    payload: Result<Json<ReverseIn>, JsonRejection>,
) -> Result<Json<ReverseAnalysisResult>, ApiError> {
    let Json(req) = payload?;
    let request = req.into_request()?;

    tracing::info!("Reverse analysis requested (mode={})", request.mode);
    let result = state
        .analyzer
        .analyze(&request)
        .await
        .map_err(|e| ApiError::wrap("Failed to run reverse analysis", e))?;

    Ok(Json(result))
}

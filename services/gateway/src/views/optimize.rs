use crate::error::ApiError;
use crate::serializers::optimize::{OptimizeIn, OptimizeOut};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

pub async fn optimize(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeIn>, JsonRejection>,
) -> Result<Json<OptimizeOut>, ApiError> {
    let Json(req) = payload?;
    let model = req.validate()?;

    tracing::info!("Optimizing prompt for {} ({} chars)", model, req.prompt.chars().count());
    let optimized_prompt = state
        .optimizer
        .optimize(model, &req.prompt)
        .await
        .map_err(|e| ApiError::wrap("Failed to optimize prompt", e))?;

    Ok(Json(OptimizeOut { optimized_prompt }))
}

use crate::error::ApiError;
use crate::serializers::chat::{ChatIn, ChatOut};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatIn>, JsonRejection>,
) -> Result<Json<ChatOut>, ApiError> {
    let Json(req) = payload?;
    let request = req.into_request()?;

    tracing::info!(
        "💬 Chat message from {} ({} chars)",
        request.source.as_deref().unwrap_or("unknown"),
        request.message.chars().count()
    );
    let reply = state
        .assistant
        .reply(&request)
        .await
        .map_err(|e| ApiError::wrap("Failed to generate chat reply", e))?;

    Ok(Json(ChatOut { reply }))
}

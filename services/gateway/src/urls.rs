use crate::middleware::{cors, trace_request, CorsPolicy};
use crate::state::AppState;
use crate::views::{chat::chat, email::send_email, health::health, optimize::optimize, reverse::reverse_ai};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};

pub fn router(state: AppState, cors_policy: CorsPolicy, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/optimize", post(optimize))
        .route("/reverse-ai", post(reverse_ai))
        .route("/send-email", post(send_email))
        .route("/chat", post(chat))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(cors_policy, cors))
        .layer(middleware::from_fn(trace_request))
        .with_state(state)
}

use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use relay_mail::{EmailRequest, EmailResponse};

/// 邮件接口永远返回 200，失败通过 `success=false` 表达
pub async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Json<EmailResponse> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return Json(EmailResponse::failed(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )))
        }
    };

    Json(state.mailer.send(&req).await)
}

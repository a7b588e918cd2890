//! Public push API. The endpoint token in the path is the only credential.

use axum::Json;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use torchi_core::error::{AppError, ErrorKind};

use crate::dto::request::{AskForm, DemoPushRequest, ReactRequest};
use crate::dto::response::{MessageResponse, PushResponse, ReactResponse, StatusResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/push/{token}
///
/// The raw request body is the message.
pub async fn push(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: String,
) -> Result<Json<PushResponse>, ApiError> {
    if body.is_empty() {
        return Err(AppError::validation("Message body is empty").into());
    }
    let sent = state.orchestrator.dispatch(&token, &body).await?;
    Ok(Json(PushResponse { sent }))
}

/// POST /api/push/{token}/ask
///
/// Responds with the reaction text, or `408 {"status":"timeout"}`.
pub async fn ask(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Form(form): Form<AskForm>,
) -> Result<Response, ApiError> {
    form.validate()?;
    let timeout = state.config.push.reply_timeout(form.timeout_seconds());
    let actions = form.action_list();
    debug!(actions = ?actions, timeout_seconds = timeout.as_secs(), "Ask request");

    match state
        .orchestrator
        .dispatch_and_await_reply(&token, &form.msg, actions, timeout)
        .await
    {
        Ok(reaction) => Ok((StatusCode::OK, reaction).into_response()),
        Err(err) if err.is(ErrorKind::Timeout) => Ok((
            StatusCode::REQUEST_TIMEOUT,
            Json(StatusResponse {
                status: "timeout".to_string(),
            }),
        )
            .into_response()),
        Err(err) => Err(err.into()),
    }
}

/// POST /api/react/{notification_id}
pub async fn react(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
    Json(req): Json<ReactRequest>,
) -> Result<Json<ReactResponse>, ApiError> {
    req.validate()?;
    let delivered = state
        .orchestrator
        .record_reaction(notification_id, &req.reaction)
        .await?;
    Ok(Json(ReactResponse { delivered }))
}

/// POST /api/push-demo
pub async fn demo_push(
    State(state): State<AppState>,
    Json(req): Json<DemoPushRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    req.validate()?;
    state
        .orchestrator
        .demo_push(&req.target(), &req.message)
        .await?;
    Ok(Json(MessageResponse::new("Demo push sent")))
}

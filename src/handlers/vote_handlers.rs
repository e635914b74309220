use crate::auth::CurrentUser;
use crate::error::Result;
use crate::models::vote::VoteRequest;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde_json::{json, Value};

/// POST /vote - `dir` 1 casts a vote, 0 withdraws it
///
/// ## Errors
/// - 404 Not Found: post missing, or withdrawing a vote that was never cast
/// - 409 Conflict: voting twice on the same post
/// - 422 Unprocessable Entity: `dir` outside {0, 1}
pub async fn vote_handler(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: std::result::Result<Json<VoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let Json(request) = payload?;
    let outcome = app_state.vote_service.vote(&user, request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": outcome.message() }))))
}

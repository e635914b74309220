use crate::error::Result;
use crate::models::user::{UserCreate, UserOut};
use crate::services::user_service::CreateUserRequest;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};

/// POST /users - register a new account
///
/// ## Errors
/// - 409 Conflict: email already registered
/// - 422 Unprocessable Entity: malformed email, empty password or bad JSON
pub async fn create_user_handler(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<UserCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<UserOut>)> {
    let Json(payload) = payload?;

    let user = app_state
        .user_service
        .create_user(CreateUserRequest {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserOut::from(user))))
}

/// GET /users/{id}
pub async fn get_user_handler(
    State(app_state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<UserOut>> {
    let Path(id) = id?;
    let user = app_state.user_service.get_user(id).await?;
    Ok(Json(UserOut::from(user)))
}

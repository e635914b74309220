use crate::error::Result;
use crate::models::token::{LoginForm, Token};
use crate::services::auth_service::LoginRequest;
use crate::AppState;
use axum::{
    extract::{rejection::FormRejection, Form, State},
    response::Json,
};

/// POST /login - exchange email/password form credentials for a bearer token
///
/// The form follows the OAuth2 password flow field names, so the email is
/// sent as `username`.
///
/// ## Errors
/// - 403 Forbidden: unknown email or wrong password
/// - 422 Unprocessable Entity: missing form fields
pub async fn login_handler(
    State(app_state): State<AppState>,
    form: std::result::Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<Token>> {
    let Form(form) = form?;

    let request = LoginRequest {
        email: form.username,
        password: form.password,
    };

    let token = app_state.auth_service.authenticate(request).await?;
    Ok(Json(token))
}

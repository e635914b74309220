use crate::error::AppError;
use crate::models::user::User;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// The authenticated caller, placed in request extensions by `require_auth`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Not authenticated".to_string()))?;

    let (scheme, token) = auth_header
        .split_once(' ')
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AppError::Unauthorized("Not authenticated".to_string()));
    }

    Ok(token.trim())
}

/// Resolves the bearer token to a user or rejects the request with 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;
    let user = state.auth_service.resolve_current_user(token).await?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn accepts_bearer_scheme_case_insensitively() {
        assert_eq!(extract_bearer_token(&headers_with("Bearer abc")).unwrap(), "abc");
        assert_eq!(extract_bearer_token(&headers_with("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn rejects_missing_or_foreign_schemes() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());
        assert!(extract_bearer_token(&headers_with("Basic dXNlcjpwdw==")).is_err());
        assert!(extract_bearer_token(&headers_with("Bearer")).is_err());
        assert!(extract_bearer_token(&headers_with("Bearer   ")).is_err());
    }
}

use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::repositories::RepositoryError;
use crate::services::{
    AuthServiceError, PostServiceError, TokenError, UserServiceError, VoteServiceError,
};

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by the HTTP layer. Every service error folds into one of
/// these, and each variant owns exactly one status code.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match &self {
            AppError::Database(_) | AppError::Internal(_) => {
                error!("Request failed: {}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) => AppError::Database(e),
            RepositoryError::NotFound => AppError::NotFound("Record not found".to_string()),
            RepositoryError::AlreadyExists => {
                AppError::Conflict("Record already exists".to_string())
            }
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InvalidEmail | UserServiceError::EmptyPassword => {
                AppError::Validation(err.to_string())
            }
            UserServiceError::UserNotFound => AppError::NotFound(err.to_string()),
            UserServiceError::EmailTaken => AppError::Conflict(err.to_string()),
            UserServiceError::HashingError(msg) => AppError::Internal(msg),
            UserServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => AppError::Forbidden(err.to_string()),
            AuthServiceError::Unauthorized => AppError::Unauthorized(err.to_string()),
            AuthServiceError::TokenError(e) => e.into(),
            AuthServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid => {
                AppError::Unauthorized("Could not validate credentials".to_string())
            }
            TokenError::Encoding(msg) => AppError::Internal(msg),
        }
    }
}

impl From<PostServiceError> for AppError {
    fn from(err: PostServiceError) -> Self {
        match err {
            PostServiceError::NotFound(_) => AppError::NotFound(err.to_string()),
            PostServiceError::Forbidden => AppError::Forbidden(err.to_string()),
            PostServiceError::Validation(msg) => AppError::Validation(msg),
            PostServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<VoteServiceError> for AppError {
    fn from(err: VoteServiceError) -> Self {
        match err {
            VoteServiceError::InvalidDirection(_) => AppError::Validation(err.to_string()),
            VoteServiceError::PostNotFound(_) | VoteServiceError::VoteNotFound => {
                AppError::NotFound(err.to_string())
            }
            VoteServiceError::AlreadyVoted { .. } => AppError::Conflict(err.to_string()),
            VoteServiceError::RepositoryError(e) => e.into(),
        }
    }
}

// Extractor rejections are malformed input, reported uniformly as 422
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        let cases = [
            (AppError::from(VoteServiceError::InvalidDirection(3)), 422),
            (AppError::from(AuthServiceError::Unauthorized), 401),
            (AppError::from(AuthServiceError::InvalidCredentials), 403),
            (AppError::from(PostServiceError::Forbidden), 403),
            (AppError::from(PostServiceError::NotFound(1)), 404),
            (AppError::from(VoteServiceError::VoteNotFound), 404),
            (
                AppError::from(VoteServiceError::AlreadyVoted {
                    user_id: 1,
                    post_id: 2,
                }),
                409,
            ),
            (AppError::from(UserServiceError::EmailTaken), 409),
            (AppError::from(UserServiceError::InvalidEmail), 422),
            (AppError::Internal("boom".to_string()), 500),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status().as_u16(), expected, "{error:?}");
        }
    }

    #[test]
    fn unauthorized_response_advertises_bearer_scheme() {
        let response = AppError::Unauthorized("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE),
            Some(&HeaderValue::from_static("Bearer"))
        );
    }
}

use crate::models::token::Token;
use crate::models::user::User;
use crate::repositories::{RepositoryError, UserRepository};
use crate::services::password::verify_password;
use crate::services::token_service::{TokenError, TokenService};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("Invalid Credentials")]
    InvalidCredentials,
    #[error("Could not validate credentials")]
    Unauthorized,
    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_repository,
            token_service,
        }
    }

    /// Checks the credentials and returns a freshly signed bearer token.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<Token, AuthServiceError> {
        let user = self
            .user_repository
            .find_by_email(request.email.trim())
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash) {
            warn!(user_id = user.id, "Rejected login with wrong password");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let access_token = self.token_service.issue(user.id)?;
        debug!(user_id = user.id, "Issued access token");

        Ok(Token::bearer(access_token))
    }

    /// Maps a bearer token to the user it was issued for.
    pub async fn resolve_current_user(&self, token: &str) -> Result<User, AuthServiceError> {
        let claims = self.token_service.verify(token).map_err(|e| {
            debug!("Bearer token rejected: {}", e);
            AuthServiceError::Unauthorized
        })?;

        self.user_repository
            .find_by_id(claims.user_id)
            .await?
            .ok_or(AuthServiceError::Unauthorized)
    }
}

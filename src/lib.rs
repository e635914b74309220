pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use config::JwtSettings;
use repositories::{SqlitePostRepository, SqliteUserRepository, SqliteVoteRepository};
use services::{AuthService, PostService, TokenService, UserService, VoteService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub post_service: Arc<PostService>,
    pub vote_service: Arc<VoteService>,
    pub pool: sqlx::SqlitePool,
}

impl AppState {
    /// Wire the SQLite repositories into the services.
    pub fn new(pool: sqlx::SqlitePool, jwt: &JwtSettings) -> Self {
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let post_repository = Arc::new(SqlitePostRepository::new(pool.clone()));
        let vote_repository = Arc::new(SqliteVoteRepository::new(pool.clone()));

        let token_service = Arc::new(TokenService::new(jwt));

        Self {
            user_service: Arc::new(UserService::new(user_repository.clone())),
            auth_service: Arc::new(AuthService::new(user_repository, token_service)),
            post_service: Arc::new(PostService::new(post_repository.clone())),
            vote_service: Arc::new(VoteService::new(vote_repository, post_repository)),
            pool,
        }
    }
}

pub mod auth_service;
pub mod password;
pub mod post_service;
pub mod token_service;
pub mod user_service;
pub mod vote_service;

pub use auth_service::{AuthService, AuthServiceError, LoginRequest};
pub use post_service::{PostService, PostServiceError};
pub use token_service::{TokenError, TokenService};
pub use user_service::{CreateUserRequest, UpdatePasswordRequest, UserService, UserServiceError};
pub use vote_service::{VoteService, VoteServiceError};

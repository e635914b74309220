pub mod post;
pub mod token;
pub mod user;
pub mod vote;

pub use post::{Post, PostCreate, PostListQuery, PostOut};
pub use token::{Claims, LoginForm, Token};
pub use user::{User, UserCreate, UserOut};
pub use vote::{Vote, VoteDirection, VoteOutcome, VoteRequest};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user::UserOut;

fn default_published() -> bool {
    true
}

/// Writable post fields. Used for create, bulk create and full-replace
/// updates; any owner supplied by the caller is not part of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostCreate {
    pub title: String,
    pub content: String,
    #[serde(default = "default_published")]
    pub published: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: i64,
    pub owner: UserOut,
}

/// A post together with the number of votes cast on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostOut {
    #[serde(rename = "Post")]
    pub post: Post,
    pub votes: i64,
}

/// Flat row produced by joining `posts` with its owner in `users`.
#[derive(Debug, FromRow)]
pub(crate) struct PostRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: i64,
    pub owner_email: String,
    pub owner_created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub(crate) struct PostWithVotesRow {
    #[sqlx(flatten)]
    pub post: PostRow,
    pub votes: i64,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            published: row.published,
            created_at: row.created_at,
            owner_id: row.owner_id,
            owner: UserOut {
                id: row.owner_id,
                email: row.owner_email,
                created_at: row.owner_created_at,
            },
        }
    }
}

impl From<PostWithVotesRow> for PostOut {
    fn from(row: PostWithVotesRow) -> Self {
        Self {
            post: row.post.into(),
            votes: row.votes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub search: String,
}

fn default_limit() -> i64 {
    20
}

impl Default for PostListQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            skip: 0,
            search: String::new(),
        }
    }
}

use crate::models::vote::Vote;
use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{is_foreign_key_violation, is_unique_violation, RepositoryError, RepositoryResult};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait VoteRepository: Send + Sync {
    async fn find(&self, post_id: i64, user_id: i64) -> RepositoryResult<Option<Vote>>;
    /// Fails with `AlreadyExists` when the (post, user) key is taken and with
    /// `NotFound` when the post or user row is gone.
    async fn create(&self, post_id: i64, user_id: i64) -> RepositoryResult<Vote>;
    async fn delete(&self, post_id: i64, user_id: i64) -> RepositoryResult<bool>;
}

pub struct SqliteVoteRepository {
    pool: SqlitePool,
}

impl SqliteVoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for SqliteVoteRepository {
    async fn find(&self, post_id: i64, user_id: i64) -> RepositoryResult<Option<Vote>> {
        let vote = sqlx::query_as::<_, Vote>(
            "SELECT post_id, user_id FROM votes WHERE post_id = ? AND user_id = ?",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vote)
    }

    async fn create(&self, post_id: i64, user_id: i64) -> RepositoryResult<Vote> {
        let result = sqlx::query("INSERT INTO votes (post_id, user_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(Vote { post_id, user_id }),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::AlreadyExists),
            Err(e) if is_foreign_key_violation(&e) => Err(RepositoryError::NotFound),
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }

    async fn delete(&self, post_id: i64, user_id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM votes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

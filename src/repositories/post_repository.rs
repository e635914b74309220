use crate::models::post::{Post, PostCreate, PostOut, PostRow, PostWithVotesRow};
use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::{is_foreign_key_violation, RepositoryError, RepositoryResult};

const POST_SELECT: &str = r#"
    SELECT
        p.id,
        p.title,
        p.content,
        p.published,
        p.created_at,
        p.owner_id,
        u.email AS owner_email,
        u.created_at AS owner_created_at
    FROM posts p
    JOIN users u ON u.id = p.owner_id
"#;

const POST_WITH_VOTES_SELECT: &str = r#"
    SELECT
        p.id,
        p.title,
        p.content,
        p.published,
        p.created_at,
        p.owner_id,
        u.email AS owner_email,
        u.created_at AS owner_created_at,
        CAST(COUNT(v.post_id) AS INTEGER) AS votes
    FROM posts p
    JOIN users u ON u.id = p.owner_id
    LEFT JOIN votes v ON v.post_id = p.id
"#;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait PostRepository: Send + Sync {
    /// Posts whose title contains `search` (case-sensitive), oldest first,
    /// each with its vote count.
    async fn list_with_votes(
        &self,
        search: &str,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<PostOut>>;
    async fn find_with_votes(&self, id: i64) -> RepositoryResult<Option<PostOut>>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Post>>;
    async fn create(&self, owner_id: i64, post: &PostCreate) -> RepositoryResult<Post>;
    /// Inserts every post in a single transaction.
    async fn create_many(&self, owner_id: i64, posts: &[PostCreate])
        -> RepositoryResult<Vec<Post>>;
    async fn update(&self, id: i64, post: &PostCreate) -> RepositoryResult<Post>;
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
}

pub struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn insert_post(
    tx: &mut Transaction<'_, Sqlite>,
    owner_id: i64,
    post: &PostCreate,
) -> RepositoryResult<Post> {
    let result =
        sqlx::query("INSERT INTO posts (title, content, published, owner_id) VALUES (?, ?, ?, ?)")
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.published)
            .bind(owner_id)
            .execute(&mut **tx)
            .await;

    let id = match result {
        Ok(res) => res.last_insert_rowid(),
        Err(e) if is_foreign_key_violation(&e) => return Err(RepositoryError::NotFound),
        Err(e) => return Err(RepositoryError::Database(e)),
    };

    let row = sqlx::query_as::<_, PostRow>(&format!("{POST_SELECT} WHERE p.id = ?"))
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;

    Ok(row.into())
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn list_with_votes(
        &self,
        search: &str,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<PostOut>> {
        // instr() keeps the match case-sensitive; LIKE would fold ASCII case.
        let rows = sqlx::query_as::<_, PostWithVotesRow>(&format!(
            "{POST_WITH_VOTES_SELECT}
            WHERE instr(p.title, ?) > 0
            GROUP BY p.id
            ORDER BY p.id
            LIMIT ? OFFSET ?"
        ))
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostOut::from).collect())
    }

    async fn find_with_votes(&self, id: i64) -> RepositoryResult<Option<PostOut>> {
        let row = sqlx::query_as::<_, PostWithVotesRow>(&format!(
            "{POST_WITH_VOTES_SELECT} WHERE p.id = ? GROUP BY p.id"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostOut::from))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!("{POST_SELECT} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Post::from))
    }

    async fn create(&self, owner_id: i64, post: &PostCreate) -> RepositoryResult<Post> {
        let mut tx = self.pool.begin().await?;
        let created = insert_post(&mut tx, owner_id, post).await?;
        tx.commit().await?;

        Ok(created)
    }

    async fn create_many(
        &self,
        owner_id: i64,
        posts: &[PostCreate],
    ) -> RepositoryResult<Vec<Post>> {
        let mut tx = self.pool.begin().await?;

        let mut created = Vec::with_capacity(posts.len());
        for post in posts {
            // An early return drops `tx`, rolling the whole batch back.
            created.push(insert_post(&mut tx, owner_id, post).await?);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, id: i64, post: &PostCreate) -> RepositoryResult<Post> {
        let result =
            sqlx::query("UPDATE posts SET title = ?, content = ?, published = ? WHERE id = ?")
                .bind(&post.title)
                .bind(&post.content)
                .bind(post.published)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub mod test_helpers {
    use crate::config::JwtSettings;
    use crate::services::{password, TokenService};
    use crate::AppState;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use tempfile::NamedTempFile;

    pub const TEST_SECRET: &str = "test-signing-secret-for-postboard-suite";

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        // One connection: every checkout must see the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when several connections must share one database
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = crate::db::create_pool(&database_url).await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok((pool, temp_file))
    }

    pub fn test_jwt_settings() -> JwtSettings {
        JwtSettings::with_secret(TEST_SECRET)
    }

    /// Application state over `pool`, signing tokens with `TEST_SECRET`
    pub fn test_app_state(pool: &SqlitePool) -> AppState {
        AppState::new(pool.clone(), &test_jwt_settings())
    }

    /// A valid bearer token for `user_id` under `test_jwt_settings()`
    pub fn issue_test_token(user_id: i64) -> Result<String, crate::services::TokenError> {
        TokenService::new(&test_jwt_settings()).issue(user_id)
    }

    /// Insert a test user with hashed password
    pub async fn insert_test_user(
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        let password_hash = password::hash_password(password).map_err(|e| {
            sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
        })?;

        let result = sqlx::query("INSERT INTO users (email, password_hash) VALUES (?, ?)")
            .bind(email)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Create a published test post owned by `owner_id`
    pub async fn insert_test_post(
        pool: &SqlitePool,
        owner_id: i64,
        title: &str,
        content: &str,
    ) -> Result<i64, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO posts (title, content, owner_id) VALUES (?, ?, ?)")
                .bind(title)
                .bind(content)
                .bind(owner_id)
                .execute(pool)
                .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn insert_test_vote(
        pool: &SqlitePool,
        post_id: i64,
        user_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO votes (post_id, user_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn count_votes(pool: &SqlitePool, post_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(pool)
            .await
    }
}

// Re-export commonly used test functions at module level for convenience
// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}

#[cfg(test)]
pub use test_helpers::{insert_test_post, insert_test_user, insert_test_vote};

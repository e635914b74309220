use crate::models::post::{Post, PostCreate, PostListQuery, PostOut};
use crate::models::user::User;
use crate::repositories::{PostRepository, RepositoryError};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    #[error("Post with id {0} was not found")]
    NotFound(i64),
    #[error("Not authorised to perform requested action")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct PostService {
    repository: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        Self { repository }
    }

    /// Every post visible to an authenticated caller, filtered by title
    /// substring and paginated in id order.
    pub async fn list_posts(
        &self,
        _requester: &User,
        query: &PostListQuery,
    ) -> Result<Vec<PostOut>, PostServiceError> {
        if query.limit < 0 {
            return Err(PostServiceError::Validation(
                "limit must not be negative".to_string(),
            ));
        }
        if query.skip < 0 {
            return Err(PostServiceError::Validation(
                "skip must not be negative".to_string(),
            ));
        }

        Ok(self
            .repository
            .list_with_votes(&query.search, query.limit, query.skip)
            .await?)
    }

    pub async fn get_post(&self, id: i64) -> Result<PostOut, PostServiceError> {
        self.repository
            .find_with_votes(id)
            .await?
            .ok_or(PostServiceError::NotFound(id))
    }

    pub async fn create_post(
        &self,
        owner: &User,
        fields: PostCreate,
    ) -> Result<Post, PostServiceError> {
        let post = self.repository.create(owner.id, &fields).await?;
        info!(post_id = post.id, owner_id = owner.id, "Created post");
        Ok(post)
    }

    /// All-or-nothing: one failed insert rolls back the whole batch.
    pub async fn create_posts_bulk(
        &self,
        owner: &User,
        fields: Vec<PostCreate>,
    ) -> Result<Vec<Post>, PostServiceError> {
        let posts = self.repository.create_many(owner.id, &fields).await?;
        info!(count = posts.len(), owner_id = owner.id, "Created posts in bulk");
        Ok(posts)
    }

    pub async fn update_post(
        &self,
        id: i64,
        owner: &User,
        fields: PostCreate,
    ) -> Result<Post, PostServiceError> {
        self.ensure_owner(id, owner).await?;

        match self.repository.update(id, &fields).await {
            Ok(post) => Ok(post),
            Err(RepositoryError::NotFound) => Err(PostServiceError::NotFound(id)),
            Err(e) => Err(PostServiceError::RepositoryError(e)),
        }
    }

    pub async fn delete_post(&self, id: i64, owner: &User) -> Result<(), PostServiceError> {
        self.ensure_owner(id, owner).await?;

        if self.repository.delete(id).await? {
            info!(post_id = id, owner_id = owner.id, "Deleted post");
            Ok(())
        } else {
            Err(PostServiceError::NotFound(id))
        }
    }

    async fn ensure_owner(&self, id: i64, owner: &User) -> Result<Post, PostServiceError> {
        let post = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(PostServiceError::NotFound(id))?;

        if post.owner_id != owner.id {
            return Err(PostServiceError::Forbidden);
        }

        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserOut;
    use crate::repositories::post_repository::MockPostRepository;
    use chrono::Utc;
    use mockall::predicate::*;

    fn user(id: i64) -> User {
        User {
            id,
            email: format!("user{id}@example.com"),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    fn post(id: i64, owner_id: i64) -> Post {
        let created_at = Utc::now();
        Post {
            id,
            title: "title".to_string(),
            content: "content".to_string(),
            published: true,
            created_at,
            owner_id,
            owner: UserOut {
                id: owner_id,
                email: format!("user{owner_id}@example.com"),
                created_at,
            },
        }
    }

    fn fields() -> PostCreate {
        PostCreate {
            title: "new title".to_string(),
            content: "new content".to_string(),
            published: false,
        }
    }

    #[tokio::test]
    async fn test_create_post_uses_requester_as_owner() {
        let mut mock_repo = MockPostRepository::new();

        mock_repo
            .expect_create()
            .withf(|owner_id, _| *owner_id == 5)
            .times(1)
            .returning(|owner_id, _| {
                let created = post(1, owner_id);
                Box::pin(async move { Ok(created) })
            });

        let service = PostService::new(Arc::new(mock_repo));
        let created = service.create_post(&user(5), fields()).await.unwrap();
        assert_eq!(created.owner_id, 5);
    }

    #[tokio::test]
    async fn test_update_post_by_non_owner_is_forbidden() {
        let mut mock_repo = MockPostRepository::new();

        mock_repo
            .expect_find_by_id()
            .with(eq(1))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(Some(post(1, 2))) }));
        mock_repo.expect_update().never();

        let service = PostService::new(Arc::new(mock_repo));
        let result = service.update_post(1, &user(3), fields()).await;
        assert!(matches!(result, Err(PostServiceError::Forbidden)));
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let mut mock_repo = MockPostRepository::new();

        mock_repo
            .expect_find_by_id()
            .with(eq(444))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo.expect_delete().never();

        let service = PostService::new(Arc::new(mock_repo));
        let result = service.delete_post(444, &user(1)).await;
        assert!(matches!(result, Err(PostServiceError::NotFound(444))));
    }

    #[tokio::test]
    async fn test_delete_post_by_non_owner_is_forbidden() {
        let mut mock_repo = MockPostRepository::new();

        mock_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async move { Ok(Some(post(4, 2))) }));
        mock_repo.expect_delete().never();

        let service = PostService::new(Arc::new(mock_repo));
        let result = service.delete_post(4, &user(1)).await;
        assert!(matches!(result, Err(PostServiceError::Forbidden)));
    }

    #[tokio::test]
    async fn test_list_posts_rejects_negative_paging() {
        let service = PostService::new(Arc::new(MockPostRepository::new()));

        let query = PostListQuery {
            limit: -1,
            ..PostListQuery::default()
        };
        let result = service.list_posts(&user(1), &query).await;
        assert!(matches!(result, Err(PostServiceError::Validation(_))));

        let query = PostListQuery {
            skip: -5,
            ..PostListQuery::default()
        };
        let result = service.list_posts(&user(1), &query).await;
        assert!(matches!(result, Err(PostServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_post_not_found() {
        let mut mock_repo = MockPostRepository::new();

        mock_repo
            .expect_find_with_votes()
            .with(eq(55))
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = PostService::new(Arc::new(mock_repo));
        let result = service.get_post(55).await;
        assert!(matches!(result, Err(PostServiceError::NotFound(55))));
    }
}

use crate::models::user::User;
use crate::models::vote::{VoteDirection, VoteOutcome, VoteRequest};
use crate::repositories::{PostRepository, RepositoryError, VoteRepository};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum VoteServiceError {
    #[error("Vote direction must be 0 or 1, got {0}")]
    InvalidDirection(i64),
    #[error("Post with id {0} does not exist")]
    PostNotFound(i64),
    #[error("User {user_id} has already voted on post {post_id}")]
    AlreadyVoted { user_id: i64, post_id: i64 },
    #[error("Vote does not exist")]
    VoteNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Per (user, post) toggle between "no vote" and "voted".
pub struct VoteService {
    vote_repository: Arc<dyn VoteRepository>,
    post_repository: Arc<dyn PostRepository>,
}

impl VoteService {
    pub fn new(
        vote_repository: Arc<dyn VoteRepository>,
        post_repository: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            vote_repository,
            post_repository,
        }
    }

    pub async fn vote(
        &self,
        voter: &User,
        request: VoteRequest,
    ) -> Result<VoteOutcome, VoteServiceError> {
        let direction = VoteDirection::try_from(request.dir)
            .map_err(VoteServiceError::InvalidDirection)?;
        let post_id = request.post_id;

        if self.post_repository.find_by_id(post_id).await?.is_none() {
            return Err(VoteServiceError::PostNotFound(post_id));
        }

        let existing = self.vote_repository.find(post_id, voter.id).await?;

        match direction {
            VoteDirection::Add => {
                if existing.is_some() {
                    return Err(VoteServiceError::AlreadyVoted {
                        user_id: voter.id,
                        post_id,
                    });
                }

                // The composite key settles concurrent inserts that both
                // passed the check above.
                match self.vote_repository.create(post_id, voter.id).await {
                    Ok(_) => {
                        info!(post_id, user_id = voter.id, "Vote added");
                        Ok(VoteOutcome::Added)
                    }
                    Err(RepositoryError::AlreadyExists) => Err(VoteServiceError::AlreadyVoted {
                        user_id: voter.id,
                        post_id,
                    }),
                    Err(RepositoryError::NotFound) => Err(VoteServiceError::PostNotFound(post_id)),
                    Err(e) => Err(VoteServiceError::RepositoryError(e)),
                }
            }
            VoteDirection::Remove => {
                if existing.is_none() || !self.vote_repository.delete(post_id, voter.id).await? {
                    return Err(VoteServiceError::VoteNotFound);
                }

                info!(post_id, user_id = voter.id, "Vote removed");
                Ok(VoteOutcome::Removed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::post::Post;
    use crate::models::user::UserOut;
    use crate::models::vote::Vote;
    use crate::repositories::post_repository::MockPostRepository;
    use crate::repositories::vote_repository::MockVoteRepository;
    use chrono::Utc;
    use mockall::predicate::*;

    fn voter() -> User {
        User {
            id: 1,
            email: "voter@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    fn existing_post(id: i64) -> Post {
        let created_at = Utc::now();
        Post {
            id,
            title: "title".to_string(),
            content: "content".to_string(),
            published: true,
            created_at,
            owner_id: 2,
            owner: UserOut {
                id: 2,
                email: "owner@example.com".to_string(),
                created_at,
            },
        }
    }

    fn posts_with(id: i64) -> MockPostRepository {
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .with(eq(id))
            .returning(|id| Box::pin(async move { Ok(Some(existing_post(id))) }));
        posts
    }

    #[tokio::test]
    async fn test_invalid_direction() {
        let service = VoteService::new(
            Arc::new(MockVoteRepository::new()),
            Arc::new(MockPostRepository::new()),
        );

        let result = service.vote(&voter(), VoteRequest { post_id: 1, dir: 2 }).await;
        assert!(matches!(result, Err(VoteServiceError::InvalidDirection(2))));
    }

    #[tokio::test]
    async fn test_vote_on_missing_post() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = VoteService::new(Arc::new(MockVoteRepository::new()), Arc::new(posts));

        let result = service.vote(&voter(), VoteRequest { post_id: 44, dir: 1 }).await;
        assert!(matches!(result, Err(VoteServiceError::PostNotFound(44))));
    }

    #[tokio::test]
    async fn test_add_vote() {
        let mut votes = MockVoteRepository::new();
        votes
            .expect_find()
            .with(eq(3), eq(1))
            .returning(|_, _| Box::pin(async move { Ok(None) }));
        votes
            .expect_create()
            .with(eq(3), eq(1))
            .times(1)
            .returning(|post_id, user_id| Box::pin(async move { Ok(Vote { post_id, user_id }) }));

        let service = VoteService::new(Arc::new(votes), Arc::new(posts_with(3)));

        let outcome = service
            .vote(&voter(), VoteRequest { post_id: 3, dir: 1 })
            .await
            .unwrap();
        assert_eq!(outcome, VoteOutcome::Added);
    }

    #[tokio::test]
    async fn test_double_vote_conflicts() {
        let mut votes = MockVoteRepository::new();
        votes.expect_find().returning(|post_id, user_id| {
            Box::pin(async move { Ok(Some(Vote { post_id, user_id })) })
        });
        votes.expect_create().never();

        let service = VoteService::new(Arc::new(votes), Arc::new(posts_with(3)));

        let result = service.vote(&voter(), VoteRequest { post_id: 3, dir: 1 }).await;
        assert!(matches!(
            result,
            Err(VoteServiceError::AlreadyVoted {
                user_id: 1,
                post_id: 3
            })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_insert_surfaces_as_conflict() {
        let mut votes = MockVoteRepository::new();
        votes
            .expect_find()
            .returning(|_, _| Box::pin(async move { Ok(None) }));
        votes
            .expect_create()
            .returning(|_, _| Box::pin(async move { Err(RepositoryError::AlreadyExists) }));

        let service = VoteService::new(Arc::new(votes), Arc::new(posts_with(3)));

        let result = service.vote(&voter(), VoteRequest { post_id: 3, dir: 1 }).await;
        assert!(matches!(result, Err(VoteServiceError::AlreadyVoted { .. })));
    }

    #[tokio::test]
    async fn test_remove_vote() {
        let mut votes = MockVoteRepository::new();
        votes.expect_find().returning(|post_id, user_id| {
            Box::pin(async move { Ok(Some(Vote { post_id, user_id })) })
        });
        votes
            .expect_delete()
            .with(eq(3), eq(1))
            .times(1)
            .returning(|_, _| Box::pin(async move { Ok(true) }));

        let service = VoteService::new(Arc::new(votes), Arc::new(posts_with(3)));

        let outcome = service
            .vote(&voter(), VoteRequest { post_id: 3, dir: 0 })
            .await
            .unwrap();
        assert_eq!(outcome, VoteOutcome::Removed);
    }

    #[tokio::test]
    async fn test_remove_missing_vote() {
        let mut votes = MockVoteRepository::new();
        votes
            .expect_find()
            .returning(|_, _| Box::pin(async move { Ok(None) }));
        votes.expect_delete().never();

        let service = VoteService::new(Arc::new(votes), Arc::new(posts_with(3)));

        let result = service.vote(&voter(), VoteRequest { post_id: 3, dir: 0 }).await;
        assert!(matches!(result, Err(VoteServiceError::VoteNotFound)));
    }
}

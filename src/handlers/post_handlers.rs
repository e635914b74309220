use crate::auth::CurrentUser;
use crate::error::Result;
use crate::models::post::{Post, PostCreate, PostListQuery, PostOut};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    Extension,
};

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
type PostId = std::result::Result<Path<i64>, PathRejection>;

/// GET /posts?search=&limit=&skip=
pub async fn list_posts_handler(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    query: std::result::Result<Query<PostListQuery>, QueryRejection>,
) -> Result<Json<Vec<PostOut>>> {
    let Query(query) = query?;
    let posts = app_state.post_service.list_posts(&user, &query).await?;
    Ok(Json(posts))
}

/// POST /posts - the caller becomes the owner
pub async fn create_post_handler(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: JsonBody<PostCreate>,
) -> Result<(StatusCode, Json<Post>)> {
    let Json(fields) = payload?;
    let post = app_state.post_service.create_post(&user, fields).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /posts/multiple - create a batch of posts in one transaction
pub async fn create_posts_bulk_handler(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: JsonBody<Vec<PostCreate>>,
) -> Result<(StatusCode, Json<Vec<Post>>)> {
    let Json(fields) = payload?;
    let posts = app_state
        .post_service
        .create_posts_bulk(&user, fields)
        .await?;
    Ok((StatusCode::CREATED, Json(posts)))
}

/// GET /posts/{id}
pub async fn get_post_handler(
    State(app_state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    id: PostId,
) -> Result<Json<PostOut>> {
    let Path(id) = id?;
    let post = app_state.post_service.get_post(id).await?;
    Ok(Json(post))
}

/// PUT /posts/{id} - full replace, owner only
///
/// ## Errors
/// - 403 Forbidden: caller does not own the post
/// - 404 Not Found: no such post
pub async fn update_post_handler(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    id: PostId,
    payload: JsonBody<PostCreate>,
) -> Result<Json<Post>> {
    let Path(id) = id?;
    let Json(fields) = payload?;
    let post = app_state.post_service.update_post(id, &user, fields).await?;
    Ok(Json(post))
}

/// DELETE /posts/{id} - owner only, votes on the post go with it
pub async fn delete_post_handler(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    id: PostId,
) -> Result<StatusCode> {
    let Path(id) = id?;
    app_state.post_service.delete_post(id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

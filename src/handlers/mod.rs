pub mod post_handlers;
pub mod user_handlers;
pub mod vote_handlers;

pub use post_handlers::{
    create_post_handler, create_posts_bulk_handler, delete_post_handler, get_post_handler,
    list_posts_handler, update_post_handler,
};
pub use user_handlers::{create_user_handler, get_user_handler};
pub use vote_handlers::vote_handler;

use axum::response::Json;
use serde_json::{json, Value};

/// GET / - liveness message
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Welcome to the postboard API" }))
}

use crate::auth::{handlers::login_handler, require_auth};
use crate::handlers;
use crate::middleware::add_security_headers;
use crate::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Assemble the full HTTP surface.
///
/// Routes under `protected_routes` run behind `require_auth`, which places
/// the resolved `CurrentUser` into request extensions for the handlers.
pub fn build_router(app_state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::root_handler))
        .route("/users", post(handlers::create_user_handler))
        .route("/login", post(login_handler));

    let protected_routes = Router::new()
        .route("/users/{id}", get(handlers::get_user_handler))
        .route(
            "/posts",
            get(handlers::list_posts_handler).post(handlers::create_post_handler),
        )
        .route("/posts/multiple", post(handlers::create_posts_bulk_handler))
        .route(
            "/posts/{id}",
            get(handlers::get_post_handler)
                .put(handlers::update_post_handler)
                .delete(handlers::delete_post_handler),
        )
        .route("/vote", post(handlers::vote_handler))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Authorization must be listed explicitly; it is not covered by a wildcard
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(add_security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state)
}

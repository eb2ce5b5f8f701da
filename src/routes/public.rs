use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any
/// client. Post reads are deliberately public; post creation and mutation
/// live on the authenticated router.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness probe for monitors and load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/register
        // Creates an account and returns the public profile plus a session token.
        .route("/auth/register", post(handlers::register))
        // POST /auth/login
        // Exchanges email+password for a session token.
        .route("/auth/login", post(handlers::login))
        // GET /posts
        // Lists all posts, newest first.
        .route("/posts", get(handlers::get_posts))
        // GET /posts/{id}
        // Retrieves a single post.
        .route("/posts/{id}", get(handlers::get_post_details))
}

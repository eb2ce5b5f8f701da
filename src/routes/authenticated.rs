use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Defines the routes accessible to any principal that has passed the
/// authentication layer. Every handler here receives a validated `AuthUser`
/// carrying the principal's id and role; the owner-only checks in
/// `update_post` and `delete_post` run against that id.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // The authenticated user's own public profile.
        .route("/me", get(handlers::get_me))
        // GET /me/posts
        // Lists the authenticated user's posts, newest first.
        .route("/me/posts", get(handlers::get_my_posts))
        // GET /users/{id}
        // Public profile lookup, open to any authenticated principal.
        .route("/users/{id}", get(handlers::get_user_details))
        // POST /posts
        // Creates a post; the principal becomes the owner.
        .route("/posts", post(handlers::create_post))
        // PUT/DELETE /posts/{id}
        // Owner-only mutation. The ownership check is made against the post
        // loaded from the store, inside the service.
        .route(
            "/posts/{id}",
            put(handlers::update_post).delete(handlers::delete_post),
        )
}

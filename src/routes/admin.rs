use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Defines the routes exclusively accessible to principals with the 'admin'
/// role. The router is nested under '/admin' behind the authentication
/// layer; the role check itself runs inside each handler after the request
/// passes authentication.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/users
        // Lists ALL user accounts. The only admin-gated operation in this
        // service; every other role sees 403.
        .route("/users", get(handlers::get_admin_users))
}

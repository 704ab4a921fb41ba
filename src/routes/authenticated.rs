use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, post},
};

/// Authenticated Router Module
///
/// Defines the routes reachable only after the authentication layer has
/// resolved a verified identity.
///
/// Access Control Strategy:
/// Every handler in this module relies on the `AuthUser` extractor middleware
/// being present on the router layer above this module. This guarantees that
/// all handlers receive a validated `AuthUser` carrying the acting user's id,
/// which the delete handler then uses for its ownership check.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /api/blogs
        // Submits a new blog owned by the authenticated user. Title and url are
        // validated before any write; the insert and the owner's set append
        // commit together.
        .route("/api/blogs", post(handlers::create_blog))
        // DELETE /api/blogs/{id}
        // Removes a blog. Owner-only: a mismatch answers 403 and leaves the
        // record untouched.
        .route("/api/blogs/{id}", delete(handlers::delete_blog))
}

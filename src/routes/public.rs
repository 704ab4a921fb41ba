use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, put},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client.
/// Reads are public for the whole board; the update endpoint is also here,
/// deliberately: the like counter is bumped via PUT by any reader, while
/// create and delete stay behind the auth layer.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load
        // balancer checks. Returns "ok" immediately.
        .route("/health", get(|| async { "ok" }))
        // GET /api/blogs
        // Lists all blogs, each enriched with its owner's summary at read time.
        .route("/api/blogs", get(handlers::list_blogs))
        // GET /api/blogs/{id}
        // Retrieves a single blog with its owner summary.
        // PUT /api/blogs/{id}
        // Partial update of title/author/url/likes. No ownership check here;
        // delete is the only ownership-guarded mutation (see DESIGN.md).
        .route(
            "/api/blogs/{id}",
            get(handlers::get_blog_details).put(handlers::update_blog),
        )
        // GET /api/users
        // Lists users with their owned blogs denormalized into each record.
        .route("/api/users", get(handlers::list_users))
}

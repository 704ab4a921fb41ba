use crate::{AppState, handlers};
use axum::{Router, routing::post};

/// Testing Router Module
///
/// Carries the state-reset endpoint used by end-to-end suites. `create_router`
/// mounts this module only when the environment is `Env::Local`; a production
/// process never exposes it.
pub fn testing_routes() -> Router<AppState> {
    Router::new()
        // POST /api/testing/reset
        // Wipes blogs, users, and the owned-set, answering 204.
        .route("/api/testing/reset", post(handlers::reset_state))
}

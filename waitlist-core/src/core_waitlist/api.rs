//! API routes definition

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Header carrying the admin credential for the membership listing
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Build the API router with all endpoints
///
/// `get` would also answer HEAD, so HEAD is routed to the 405 fallback
/// explicitly.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/waitlist",
            post(handlers::join_waitlist).fallback(handlers::method_not_allowed),
        )
        .route(
            "/waitlist-count",
            get(handlers::waitlist_count)
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/waitlist-list",
            get(handlers::waitlist_list)
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        .with_state(state)
}

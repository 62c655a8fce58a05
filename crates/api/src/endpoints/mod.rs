//! API endpoints.

mod reports;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/reports", reports::router())
        .nest("/users", users::router())
}

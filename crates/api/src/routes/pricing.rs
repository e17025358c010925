//! Route definitions for the pricing-unlock gate.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::pricing;
use crate::state::AppState;

/// Pricing routes mounted at `/pricing`.
///
/// ```text
/// POST   /unlock            -> unlock
/// PUT    /password          -> set_password (admin token)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/unlock", post(pricing::unlock))
        .route("/password", put(pricing::set_password))
}

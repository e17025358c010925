//! Route definitions for the approval workflow.

use axum::routing::post;
use axum::Router;

use crate::handlers::approvals;
use crate::state::AppState;

/// Approval routes mounted at `/approvals`. All take the scope in the
/// request body.
///
/// ```text
/// POST   /submit            -> submit
/// POST   /cancel            -> cancel
/// POST   /approve           -> approve
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submit", post(approvals::submit))
        .route("/cancel", post(approvals::cancel))
        .route("/approve", post(approvals::approve))
}

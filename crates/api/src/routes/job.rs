//! Route definitions for job-scoped operations.

use axum::routing::{delete, post, put};
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Job routes mounted at `/jobs`.
///
/// ```text
/// DELETE /{id}                -> delete (refused while locked)
/// POST   /{id}/move           -> move_job
/// POST   /{id}/copy           -> copy_job
/// PUT    /{id}/items/reorder  -> reorder_items
/// POST   /{id}/edit           -> save_order_edit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(jobs::delete))
        .route("/{id}/move", post(jobs::move_job))
        .route("/{id}/copy", post(jobs::copy_job))
        .route("/{id}/items/reorder", put(jobs::reorder_items))
        .route("/{id}/edit", post(jobs::save_order_edit))
}

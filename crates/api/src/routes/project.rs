//! Route definitions for projects and their nested collections.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{jobs, members, projects, sharing};
use crate::state::AppState;

/// Project routes mounted at `/projects`.
///
/// ```text
/// GET    /                            -> list
/// GET    /{id}                        -> detail
/// DELETE /{id}                        -> delete (owner)
/// POST   /{id}/jobs                   -> jobs::create
/// PUT    /{id}/jobs/reorder           -> jobs::reorder
/// POST   /{id}/members                -> members::add (owner)
/// DELETE /{id}/members/{customer_id}  -> members::remove (owner)
/// POST   /{id}/share                  -> sharing::mint
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list))
        .route("/{id}", get(projects::detail).delete(projects::delete))
        .route("/{id}/jobs", post(jobs::create))
        .route("/{id}/jobs/reorder", put(jobs::reorder))
        .route("/{id}/members", post(members::add))
        .route("/{id}/members/{customer_id}", delete(members::remove))
        .route("/{id}/share", post(sharing::mint))
}

pub mod approval;
pub mod cart;
pub mod health;
pub mod job;
pub mod pricing;
pub mod project;
pub mod share;

use axum::routing::delete;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /cart/save                                save cart into a project/job
///
/// /projects                                 list (owned + member-of)
/// /projects/{id}                            detail, delete
/// /projects/{id}/jobs                       create job
/// /projects/{id}/jobs/reorder               reorder jobs (PUT)
/// /projects/{id}/members                    add member by email
/// /projects/{id}/members/{customer_id}      remove member
/// /projects/{id}/share                      mint share token
///
/// /share/redeem                             redeem a share token
///
/// /jobs/{id}                                delete
/// /jobs/{id}/move                           move to another project
/// /jobs/{id}/copy                           copy into a project
/// /jobs/{id}/items/reorder                  reorder items (PUT)
/// /jobs/{id}/edit                           batch order edit
///
/// /items/{id}                               delete one item
///
/// /approvals/submit                         request approval (scope in body)
/// /approvals/cancel                         cancel/reject with optional reason
/// /approvals/approve                        approve (idempotent)
///
/// /pricing/unlock                           verify pricing password
/// /pricing/password                         set/clear pricing password (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart::router())
        .nest("/projects", project::router())
        .nest("/share", share::router())
        .nest("/jobs", job::router())
        .route("/items/{id}", delete(handlers::items::delete))
        .nest("/approvals", approval::router())
        .nest("/pricing", pricing::router())
}

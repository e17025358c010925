//! Handler for deleting a single line item.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use orderdesk_core::access;
use orderdesk_core::error::CoreError;
use orderdesk_core::types::DbId;
use orderdesk_db::repositories::{JobItemRepo, JobRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::identity::StorefrontCustomer;
use crate::services::access::job_with_role;
use crate::state::AppState;

/// DELETE /api/v1/items/{id}
///
/// Also clears the parent job's pending job-level approval request,
/// since the job's contents have changed.
pub async fn delete(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let item = JobItemRepo::find_in_shop(&state.pool, &caller.shop, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "JobItem",
            id,
        })?;

    let (job, _project, role) = job_with_role(&state, &caller, item.job_id).await?;
    access::require_edit(role)?;

    if JobRepo::is_locked(&state.pool, job.id).await? {
        return Err(AppError::Core(CoreError::Locked(format!(
            "job {} is locked; copy it to make changes",
            job.id
        ))));
    }

    JobItemRepo::delete(&state.pool, &item).await?;
    Ok(StatusCode::NO_CONTENT)
}

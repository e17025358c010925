//! Handlers for jobs: create, reorder, delete, move, copy and the batch
//! order edit.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use orderdesk_core::access;
use orderdesk_core::error::CoreError;
use orderdesk_core::types::DbId;
use orderdesk_db::models::job::Job;
use orderdesk_db::models::job_item::SaveOrderEdit;
use orderdesk_db::repositories::{JobItemRepo, JobRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::identity::StorefrontCustomer;
use crate::services::access::{job_with_role, project_with_role};
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct CreateJobRequest {
    pub name: String,
}

/// POST /api/v1/projects/{id}/jobs
pub async fn create(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path(id): Path<DbId>,
    Json(input): Json<CreateJobRequest>,
) -> AppResult<(StatusCode, Json<Job>)> {
    let (project, role) = project_with_role(&state, &caller, id).await?;
    access::require_edit(role)?;

    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "job name must not be empty".into(),
        )));
    }

    let job = JobRepo::create(&state.pool, project.id, name).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[derive(Debug, serde::Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<DbId>,
}

/// PUT /api/v1/projects/{id}/jobs/reorder
///
/// Takes the complete permutation of the project's job ids. A partial or
/// foreign set fails `INVALID_ORDER` and changes nothing.
pub async fn reorder(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path(id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<StatusCode> {
    let (project, role) = project_with_role(&state, &caller, id).await?;
    access::require_edit(role)?;
    JobRepo::reorder(&state.pool, project.id, &input.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/jobs/{id}
///
/// Locked jobs cannot be deleted; copy them first.
pub async fn delete(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let (job, _project, role) = job_with_role(&state, &caller, id).await?;
    access::require_edit(role)?;

    if JobRepo::is_locked(&state.pool, job.id).await? {
        return Err(AppError::Core(CoreError::Locked(format!(
            "job {} is locked; copy it to make changes",
            job.id
        ))));
    }

    JobRepo::delete(&state.pool, job.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, serde::Deserialize)]
pub struct TargetProjectRequest {
    pub project_id: DbId,
}

/// POST /api/v1/jobs/{id}/move
pub async fn move_job(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path(id): Path<DbId>,
    Json(input): Json<TargetProjectRequest>,
) -> AppResult<StatusCode> {
    let (job, _project, role) = job_with_role(&state, &caller, id).await?;
    access::require_edit(role)?;

    let dest = ProjectRepo::find_in_shop(&state.pool, &caller.shop, input.project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        })?;

    JobRepo::move_to_project(&state.pool, job.id, dest.id).await?;
    tracing::info!(job_id = job.id, dest_project_id = dest.id, "job moved");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/jobs/{id}/copy
///
/// The copy gets fresh ids, lands unlocked at the end of the target
/// project, and leaves the original untouched.
pub async fn copy_job(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path(id): Path<DbId>,
    Json(input): Json<TargetProjectRequest>,
) -> AppResult<(StatusCode, Json<Job>)> {
    let (job, _project, role) = job_with_role(&state, &caller, id).await?;
    access::require_edit(role)?;

    let dest = ProjectRepo::find_in_shop(&state.pool, &caller.shop, input.project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        })?;

    let copy = JobRepo::copy_to_project(&state.pool, job.id, dest.id).await?;
    tracing::info!(job_id = job.id, copy_id = copy.id, "job copied");
    Ok((StatusCode::CREATED, Json(copy)))
}

/// PUT /api/v1/jobs/{id}/items/reorder
pub async fn reorder_items(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path(id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<StatusCode> {
    let (job, _project, role) = job_with_role(&state, &caller, id).await?;
    access::require_edit(role)?;
    JobItemRepo::reorder(&state.pool, job.id, &input.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/jobs/{id}/edit
///
/// Batch order edit: removals, quantity updates, optional job deletion.
/// Refused for locked jobs.
pub async fn save_order_edit(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path(id): Path<DbId>,
    Json(input): Json<SaveOrderEdit>,
) -> AppResult<StatusCode> {
    let (job, _project, role) = job_with_role(&state, &caller, id).await?;
    access::require_edit(role)?;
    JobItemRepo::save_order_edit(&state.pool, job.id, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

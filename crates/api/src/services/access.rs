//! Shared project resolution and permission checks for handlers.

use orderdesk_core::access::Role;
use orderdesk_core::error::CoreError;
use orderdesk_core::types::DbId;
use orderdesk_db::models::job::Job;
use orderdesk_db::models::project::Project;
use orderdesk_db::repositories::{JobRepo, ProjectRepo};

use crate::error::AppResult;
use crate::middleware::identity::StorefrontCustomer;
use crate::state::AppState;

/// Resolve a project within the caller's tenant and compute their
/// effective role. Fails `NotFound` when the id does not resolve.
pub async fn project_with_role(
    state: &AppState,
    caller: &StorefrontCustomer,
    project_id: DbId,
) -> AppResult<(Project, Option<Role>)> {
    let project = ProjectRepo::find_in_shop(&state.pool, &caller.shop, project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;
    let role = ProjectRepo::role_of(&state.pool, &project, caller.customer_id).await?;
    Ok((project, role))
}

/// Resolve a job within the caller's tenant together with its project
/// and the caller's role on that project.
pub async fn job_with_role(
    state: &AppState,
    caller: &StorefrontCustomer,
    job_id: DbId,
) -> AppResult<(Job, Project, Option<Role>)> {
    let job = JobRepo::find_in_shop(&state.pool, &caller.shop, job_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        })?;
    let (project, role) = project_with_role(state, caller, job.project_id).await?;
    Ok((job, project, role))
}

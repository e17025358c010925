//! Handlers for the `/projects` resource.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use orderdesk_core::access::{self, Role};
use orderdesk_core::types::{CustomerId, DbId};
use orderdesk_db::models::approval::ApprovalRequest;
use orderdesk_db::models::job::Job;
use orderdesk_db::models::job_item::JobItem;
use orderdesk_db::models::project::Project;
use orderdesk_db::repositories::{ApprovalRepo, JobItemRepo, JobRepo, ProjectRepo};

use crate::clients::catalog::VariantInfo;
use crate::error::AppResult;
use crate::middleware::identity::StorefrontCustomer;
use crate::services::access::project_with_role;
use crate::state::AppState;

/// One line item with its resolved catalog metadata.
#[derive(Debug, serde::Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: JobItem,
    pub variant: VariantInfo,
}

/// One job with its effective lock state and ordered items.
#[derive(Debug, serde::Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    /// Explicit flag OR an associated placed order.
    pub locked: bool,
    pub items: Vec<ItemView>,
}

/// A member row enriched with directory data where available.
#[derive(Debug, serde::Serialize)]
pub struct MemberView {
    pub customer_id: CustomerId,
    pub role: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Full project detail for the storefront UI.
#[derive(Debug, serde::Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub role: Role,
    pub members: Vec<MemberView>,
    pub jobs: Vec<JobView>,
    pub approvals: Vec<ApprovalRequest>,
    /// Set when a catalog/directory lookup failed and placeholders were
    /// substituted.
    pub warning: Option<String>,
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
) -> AppResult<Json<Vec<Project>>> {
    let projects =
        ProjectRepo::list_for_customer(&state.pool, &caller.shop, caller.customer_id).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
///
/// Any member (view included) may read. Catalog/directory failures
/// degrade to placeholders plus a warning rather than failing the read.
pub async fn detail(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let (project, role) = project_with_role(&state, &caller, id).await?;
    let role = access::require_member(role)?;

    let mut warning = None;

    let jobs = JobRepo::list_by_project(&state.pool, project.id).await?;
    let mut job_views = Vec::with_capacity(jobs.len());
    for job in jobs {
        let locked = JobRepo::is_locked(&state.pool, job.id).await?;
        let items = JobItemRepo::list_by_job(&state.pool, job.id).await?;
        let variant_ids: Vec<String> = items.iter().map(|i| i.variant_id.clone()).collect();
        let catalog = match state.catalog.lookup(&caller.shop, &variant_ids).await {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(error = %e, job_id = job.id, "catalog lookup failed");
                warning = Some("Some product details could not be loaded".to_string());
                HashMap::new()
            }
        };
        let items = items
            .into_iter()
            .map(|item| {
                let variant = catalog
                    .get(&item.variant_id)
                    .cloned()
                    .unwrap_or_else(|| VariantInfo::placeholder(&item.variant_id));
                ItemView { item, variant }
            })
            .collect();
        job_views.push(JobView { job, locked, items });
    }

    let member_rows = ProjectRepo::members(&state.pool, project.id).await?;
    let ids: Vec<CustomerId> = member_rows.iter().map(|m| m.customer_id).collect();
    let profiles = match state.directory.lookup(&caller.shop, &ids).await {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(error = %e, "directory lookup failed");
            warning = Some("Some member details could not be loaded".to_string());
            HashMap::new()
        }
    };
    let members = member_rows
        .into_iter()
        .map(|m| {
            let profile = profiles.get(&m.customer_id);
            MemberView {
                customer_id: m.customer_id,
                role: m.role,
                email: profile.map(|p| p.email.clone()),
                display_name: profile.map(|p| p.display_name()),
            }
        })
        .collect();

    let approvals = ApprovalRepo::list_by_project(&state.pool, project.id).await?;

    Ok(Json(ProjectDetail {
        project,
        role,
        members,
        jobs: job_views,
        approvals,
        warning,
    }))
}

/// DELETE /api/v1/projects/{id}
///
/// Owner only. Jobs, items, members, tokens and approval requests
/// cascade.
pub async fn delete(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let (project, role) = project_with_role(&state, &caller, id).await?;
    access::require_owner(role)?;
    ProjectRepo::delete(&state.pool, project.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Handlers for project membership.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use orderdesk_core::access::{self, MemberRole};
use orderdesk_core::error::CoreError;
use orderdesk_core::types::{CustomerId, DbId};
use orderdesk_db::models::member::ProjectMember;
use orderdesk_db::repositories::MemberRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::identity::StorefrontCustomer;
use crate::services::access::project_with_role;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct AddMemberRequest {
    pub email: String,
    pub role: MemberRole,
}

/// POST /api/v1/projects/{id}/members
///
/// Owner only. Resolves the email through the customer directory; a
/// directory failure is fatal here because the lookup is the operation.
pub async fn add(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path(id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<(StatusCode, Json<ProjectMember>)> {
    let (project, role) = project_with_role(&state, &caller, id).await?;
    access::require_owner(role)?;

    let email = input.email.trim();
    if email.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "email must not be empty".into(),
        )));
    }

    let customer_id = state
        .directory
        .find_customer_id_by_email(&caller.shop, email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "no customer found for '{email}'"
            )))
        })?;

    // The owner's membership is derived; never materialize a row for it.
    if customer_id == project.owner_customer_id {
        return Err(AppError::Core(CoreError::Validation(
            "the project owner is already a member".into(),
        )));
    }

    let member = MemberRepo::upsert(&state.pool, project.id, customer_id, input.role).await?;
    tracing::info!(
        project_id = project.id,
        customer_id,
        role = member.role,
        "member added"
    );
    Ok((StatusCode::CREATED, Json(member)))
}

/// DELETE /api/v1/projects/{id}/members/{customer_id}
pub async fn remove(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path((id, customer_id)): Path<(DbId, CustomerId)>,
) -> AppResult<StatusCode> {
    let (project, role) = project_with_role(&state, &caller, id).await?;
    access::require_owner(role)?;

    if customer_id == project.owner_customer_id {
        return Err(AppError::Core(CoreError::Validation(
            "the project owner cannot be removed".into(),
        )));
    }

    let existed = MemberRepo::remove(&state.pool, project.id, customer_id).await?;
    if !existed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ProjectMember",
            id: customer_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

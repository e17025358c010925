//! Handlers for the approval workflow endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use orderdesk_db::models::approval::ApprovalRequest;

use crate::error::AppResult;
use crate::middleware::identity::StorefrontCustomer;
use crate::services::access::project_with_role;
use crate::services::approval::{self, ApproveOutcome, ScopePayload};
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct SubmitRequest {
    #[serde(flatten)]
    pub scope: ScopePayload,
}

/// POST /api/v1/approvals/submit
///
/// Any member may request approval. Refused with 503 when notifications
/// are not configured and 422 when no eligible approvers remain.
pub async fn submit(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Json(input): Json<SubmitRequest>,
) -> AppResult<(StatusCode, Json<ApprovalRequest>)> {
    let scope = input.scope.scope()?;
    let (project, role) = project_with_role(&state, &caller, input.scope.project_id).await?;
    approval::require_requester_membership(role)?;

    let request = approval::submit(&state, &caller, &project, scope).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

#[derive(Debug, serde::Deserialize)]
pub struct CancelRequest {
    #[serde(flatten)]
    pub scope: ScopePayload,
    pub reason: Option<String>,
}

/// POST /api/v1/approvals/cancel
pub async fn cancel(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Json(input): Json<CancelRequest>,
) -> AppResult<StatusCode> {
    let scope = input.scope.scope()?;
    let (project, _role) = project_with_role(&state, &caller, input.scope.project_id).await?;
    approval::cancel(&state, &caller, &project, scope, input.reason.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/approvals/approve
///
/// Idempotent: approving an already-approved scope returns the existing
/// request with `already_approved: true` and sends nothing.
pub async fn approve(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Json(input): Json<SubmitRequest>,
) -> AppResult<Json<ApproveOutcome>> {
    let scope = input.scope.scope()?;
    let (project, _role) = project_with_role(&state, &caller, input.scope.project_id).await?;
    let outcome = approval::approve(&state, &caller, &project, scope).await?;
    Ok(Json(outcome))
}

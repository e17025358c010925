//! The approval workflow: submit, cancel and approve with their
//! notification side effects.
//!
//! Per scope the state machine is `none -> awaiting -> approved`, with
//! cancel taking `awaiting` back to `none` and `approved` terminal.
//! Submit treats a failed email round-trip as the operation's failure
//! (sending is the point of that call); approve and cancel commit their
//! state change first and email best-effort afterwards.

use std::collections::HashMap;

use orderdesk_core::access;
use orderdesk_core::approval::{
    approval_recipients, is_non_approver, scope_label, ApprovalScope, ApproverCandidate,
};
use orderdesk_core::error::CoreError;
use orderdesk_core::types::DbId;
use orderdesk_db::models::approval::ApprovalRequest;
use orderdesk_db::models::project::Project;
use orderdesk_db::repositories::{ApprovalRepo, JobItemRepo, JobRepo, ProjectRepo};

use crate::clients::catalog::VariantInfo;
use crate::error::{AppError, AppResult};
use crate::middleware::identity::StorefrontCustomer;
use crate::state::AppState;

/// Outcome of an approve call.
#[derive(Debug, serde::Serialize)]
pub struct ApproveOutcome {
    pub request: ApprovalRequest,
    pub already_approved: bool,
}

/// Submit a request for approval at the given scope.
///
/// Hard preconditions: notifications configured, at least one eligible
/// recipient. One email per recipient goes out before the request row is
/// upserted, so a send failure leaves no state behind.
pub async fn submit(
    state: &AppState,
    caller: &StorefrontCustomer,
    project: &Project,
    scope: ApprovalScope,
) -> AppResult<ApprovalRequest> {
    let notifier = state.notifier.as_ref().ok_or_else(|| {
        CoreError::Configuration("notification delivery is not configured".into())
    })?;

    let label = resolve_scope_label(state, caller, project, scope).await?;

    let candidates = approver_candidates(state, caller, project).await?;
    let recipients = approval_recipients(&candidates, caller.customer_id);
    if recipients.is_empty() {
        return Err(CoreError::NoApprovers.into());
    }

    let link = format!("{}/projects/{}", state.config.app_base_url, project.id);
    let subject = format!("Approval requested: {label}");
    let body = format!(
        "An approval has been requested for {label}.\n\nReview it here: {link}\n"
    );
    for recipient in &recipients {
        notifier.send(&recipient.email, &subject, &body).await?;
    }

    let request =
        ApprovalRepo::upsert_open(&state.pool, project.id, scope, caller.customer_id).await?;
    tracing::info!(
        project_id = project.id,
        ?scope,
        recipients = recipients.len(),
        "approval requested"
    );
    Ok(request)
}

/// Cancel (reject) the request at a scope, optionally notifying all
/// members with the rejection reason.
pub async fn cancel(
    state: &AppState,
    caller: &StorefrontCustomer,
    project: &Project,
    scope: ApprovalScope,
    reason: Option<&str>,
) -> AppResult<()> {
    let role = ProjectRepo::role_of(&state.pool, project, caller.customer_id).await?;
    access::require_edit(role)?;

    let request = ApprovalRepo::find_by_scope(&state.pool, project.id, scope)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ApprovalRequest",
            id: 0,
        })?;
    if request.is_approved() {
        return Err(CoreError::AlreadyApproved.into());
    }
    ApprovalRepo::delete(&state.pool, request.id).await?;

    // Courtesy notice only; the cancellation stands even if email fails.
    if let (Some(notifier), Some(reason)) = (state.notifier.as_ref(), reason) {
        let label = resolve_scope_label(state, caller, project, scope).await?;
        let subject = format!("Approval request rejected: {label}");
        let body = format!("The approval request for {label} was rejected.\n\nReason: {reason}\n");
        match member_emails(state, caller, project).await {
            Ok(emails) => {
                for email in emails {
                    if let Err(e) = notifier.send(&email, &subject, &body).await {
                        tracing::error!(error = %e, to = %email, "rejection notice failed");
                    }
                }
            }
            Err(e) => tracing::error!(error = %e, "could not resolve rejection recipients"),
        }
    }
    Ok(())
}

/// Approve the request at a scope. Callers must be project members not
/// tagged as non-approvers; repeat approvals are idempotent no-ops.
pub async fn approve(
    state: &AppState,
    caller: &StorefrontCustomer,
    project: &Project,
    scope: ApprovalScope,
) -> AppResult<ApproveOutcome> {
    let role = ProjectRepo::role_of(&state.pool, project, caller.customer_id).await?;
    access::require_member(role)?;

    // The eligibility gate needs the caller's tags; a directory failure
    // or a missing profile is fatal because we cannot verify who is
    // approving.
    let profiles = state
        .directory
        .lookup(&caller.shop, &[caller.customer_id])
        .await?;
    let profile = profiles.get(&caller.customer_id).ok_or_else(|| {
        CoreError::Forbidden("approver eligibility could not be verified".into())
    })?;
    if is_non_approver(&profile.tags) {
        return Err(AppError::Core(CoreError::Forbidden(
            "members tagged as non-approvers cannot approve".into(),
        )));
    }

    let request = ApprovalRepo::find_by_scope(&state.pool, project.id, scope)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ApprovalRequest",
            id: 0,
        })?;

    let (request, already_approved) =
        ApprovalRepo::approve(&state.pool, request.id, caller.customer_id).await?;
    if already_approved {
        return Ok(ApproveOutcome {
            request,
            already_approved: true,
        });
    }

    // Best-effort summary email; the approval stands regardless.
    if let Some(notifier) = state.notifier.as_ref() {
        match approval_summary(state, caller, project, scope).await {
            Ok((label, summary)) => {
                let subject = format!("Approved: {label}");
                let body = format!("{label} has been approved.\n\n{summary}");
                match member_emails(state, caller, project).await {
                    Ok(emails) => {
                        for email in emails {
                            if let Err(e) = notifier.send(&email, &subject, &body).await {
                                tracing::error!(error = %e, to = %email, "approval notice failed");
                            }
                        }
                    }
                    Err(e) => tracing::error!(error = %e, "could not resolve approval recipients"),
                }
            }
            Err(e) => tracing::error!(error = %e, "could not build approval summary"),
        }
    }

    Ok(ApproveOutcome {
        request,
        already_approved: false,
    })
}

/// Validate the scope against the project's actual jobs/items and build
/// its display label, degrading to raw names when the catalog is down.
async fn resolve_scope_label(
    state: &AppState,
    caller: &StorefrontCustomer,
    project: &Project,
    scope: ApprovalScope,
) -> AppResult<String> {
    let job = match scope.job_id() {
        Some(job_id) => {
            let job = JobRepo::find_in_shop(&state.pool, &caller.shop, job_id)
                .await?
                .filter(|j| j.project_id == project.id)
                .ok_or(CoreError::NotFound {
                    entity: "Job",
                    id: job_id,
                })?;
            Some(job)
        }
        None => None,
    };

    let item_title = match (scope.item_id(), &job) {
        (Some(item_id), Some(job)) => {
            let item = JobItemRepo::find_in_shop(&state.pool, &caller.shop, item_id)
                .await?
                .filter(|i| i.job_id == job.id)
                .ok_or(CoreError::NotFound {
                    entity: "JobItem",
                    id: item_id,
                })?;
            let info = lookup_or_placeholder(state, caller, &[item.variant_id.clone()]).await;
            Some(
                info.get(&item.variant_id)
                    .map(|v| v.title.clone())
                    .unwrap_or_else(|| format!("Variant {}", item.variant_id)),
            )
        }
        _ => None,
    };

    Ok(scope_label(
        &project.name,
        job.as_ref().map(|j| j.name.as_str()),
        item_title.as_deref(),
    ))
}

/// The affected items and quantities, grouped by job, for the approval
/// notice.
async fn approval_summary(
    state: &AppState,
    caller: &StorefrontCustomer,
    project: &Project,
    scope: ApprovalScope,
) -> AppResult<(String, String)> {
    let label = resolve_scope_label(state, caller, project, scope).await?;

    let jobs = match scope.job_id() {
        Some(job_id) => JobRepo::list_by_project(&state.pool, project.id)
            .await?
            .into_iter()
            .filter(|j| j.id == job_id)
            .collect(),
        None => JobRepo::list_by_project(&state.pool, project.id).await?,
    };

    let mut lines = Vec::new();
    for job in &jobs {
        let mut items = JobItemRepo::list_by_job(&state.pool, job.id).await?;
        if let Some(item_id) = scope.item_id() {
            items.retain(|i| i.id == item_id);
        }
        if items.is_empty() {
            continue;
        }
        let variant_ids: Vec<String> = items.iter().map(|i| i.variant_id.clone()).collect();
        let info = lookup_or_placeholder(state, caller, &variant_ids).await;
        lines.push(format!("{}:", job.name));
        for item in &items {
            let title = info
                .get(&item.variant_id)
                .map(|v| v.title.clone())
                .unwrap_or_else(|| format!("Variant {}", item.variant_id));
            lines.push(format!("  {} x {}", item.quantity, title));
        }
    }
    Ok((label, lines.join("\n")))
}

/// Effective members resolved through the directory, for recipient
/// filtering.
async fn approver_candidates(
    state: &AppState,
    caller: &StorefrontCustomer,
    project: &Project,
) -> AppResult<Vec<ApproverCandidate>> {
    let ids = ProjectRepo::effective_member_ids(&state.pool, project).await?;
    let profiles = state.directory.lookup(&caller.shop, &ids).await?;
    Ok(ids
        .iter()
        .filter_map(|id| {
            profiles.get(id).map(|p| ApproverCandidate {
                customer_id: *id,
                email: p.email.clone(),
                tags: p.tags.clone(),
            })
        })
        .collect())
}

/// Email addresses of every effective member (owner included), for the
/// broadcast notices.
async fn member_emails(
    state: &AppState,
    caller: &StorefrontCustomer,
    project: &Project,
) -> Result<Vec<String>, AppError> {
    let ids = ProjectRepo::effective_member_ids(&state.pool, project).await?;
    let profiles = state.directory.lookup(&caller.shop, &ids).await?;
    Ok(ids
        .iter()
        .filter_map(|id| profiles.get(id).map(|p| p.email.clone()))
        .collect())
}

async fn lookup_or_placeholder(
    state: &AppState,
    caller: &StorefrontCustomer,
    variant_ids: &[String],
) -> HashMap<String, VariantInfo> {
    match state.catalog.lookup(&caller.shop, variant_ids).await {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(error = %e, "catalog lookup failed; using placeholders");
            variant_ids
                .iter()
                .map(|id| (id.clone(), VariantInfo::placeholder(id)))
                .collect()
        }
    }
}

/// Scope payload shared by the approval endpoints.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ScopePayload {
    pub project_id: DbId,
    pub job_id: Option<DbId>,
    pub item_id: Option<DbId>,
}

impl ScopePayload {
    pub fn scope(&self) -> Result<ApprovalScope, CoreError> {
        if self.item_id.is_some() && self.job_id.is_none() {
            return Err(CoreError::Validation(
                "item_id requires job_id to be set".into(),
            ));
        }
        Ok(ApprovalScope::from_columns(self.job_id, self.item_id))
    }
}

/// Requester eligibility for submit: any effective member may ask.
pub fn require_requester_membership(
    role: Option<orderdesk_core::access::Role>,
) -> Result<(), CoreError> {
    access::require_member(role).map(|_| ())
}

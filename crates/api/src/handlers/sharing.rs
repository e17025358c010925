//! Handlers for project share links.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use orderdesk_core::access::{self, MemberRole};
use orderdesk_core::types::DbId;
use orderdesk_db::models::project::Project;
use orderdesk_db::repositories::ShareTokenRepo;

use crate::error::AppResult;
use crate::middleware::identity::StorefrontCustomer;
use crate::services::access::project_with_role;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct ShareRequest {
    pub role: MemberRole,
}

/// The minted token plus the storefront path that redeems it.
#[derive(Debug, serde::Serialize)]
pub struct ShareResponse {
    pub token: String,
    pub role: MemberRole,
    pub redemption_url: String,
}

/// POST /api/v1/projects/{id}/share
///
/// Editors and owners may mint invite links. The token is returned only
/// here; it is never serialized on later reads.
pub async fn mint(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Path(id): Path<DbId>,
    Json(input): Json<ShareRequest>,
) -> AppResult<(StatusCode, Json<ShareResponse>)> {
    let (project, role) = project_with_role(&state, &caller, id).await?;
    access::require_edit(role)?;

    let token = ShareTokenRepo::mint(&state.pool, project.id, input.role).await?;
    let redemption_url = format!("{}/share/{}", state.config.app_base_url, token.token);
    tracing::info!(project_id = project.id, role = ?input.role, "share token minted");
    Ok((
        StatusCode::CREATED,
        Json(ShareResponse {
            token: token.token,
            role: input.role,
            redemption_url,
        }),
    ))
}

#[derive(Debug, serde::Deserialize)]
pub struct RedeemRequest {
    pub token: String,
}

/// POST /api/v1/share/redeem
///
/// Grants the caller the token's role on its project. Idempotent for
/// repeat redeemers; the owner redeeming their own link is a no-op.
pub async fn redeem(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Json(input): Json<RedeemRequest>,
) -> AppResult<Json<Project>> {
    let project =
        ShareTokenRepo::redeem(&state.pool, &caller.shop, &input.token, caller.customer_id)
            .await?;
    tracing::info!(
        project_id = project.id,
        customer_id = caller.customer_id,
        "share token redeemed"
    );
    Ok(Json(project))
}

//! Handlers for the pricing-unlock gate.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use orderdesk_core::error::CoreError;
use orderdesk_db::repositories::ShopSettingsRepo;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::identity::StorefrontCustomer;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct UnlockRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, serde::Serialize)]
pub struct UnlockResponse {
    pub unlocked: bool,
}

/// POST /api/v1/pricing/unlock
///
/// With no password configured for the shop, pricing is open and every
/// caller unlocks. A configured password must match or the call fails
/// `FORBIDDEN`.
pub async fn unlock(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Json(input): Json<UnlockRequest>,
) -> AppResult<Json<UnlockResponse>> {
    let settings = ShopSettingsRepo::find(&state.pool, &caller.shop).await?;
    let hash = settings.and_then(|s| s.pricing_password_hash);

    let Some(hash) = hash else {
        return Ok(Json(UnlockResponse { unlocked: true }));
    };

    let matches = verify_password(&input.password, &hash)
        .map_err(|e| AppError::InternalError(format!("password verification failed: {e}")))?;
    if !matches {
        return Err(AppError::Core(CoreError::Forbidden(
            "incorrect pricing password".into(),
        )));
    }
    Ok(Json(UnlockResponse { unlocked: true }))
}

#[derive(Debug, serde::Deserialize)]
pub struct SetPasswordRequest {
    pub shop: String,
    /// `None` clears the password, reopening pricing for the shop.
    pub password: Option<String>,
}

/// PUT /api/v1/pricing/password
///
/// Merchant-only, gated by the `x-admin-token` shared secret rather than
/// storefront identity.
pub async fn set_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<SetPasswordRequest>,
) -> AppResult<Json<UnlockResponse>> {
    let expected = state.config.admin_api_token.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Configuration(
            "admin endpoints are not configured".into(),
        ))
    })?;
    let provided = headers
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if provided != expected {
        return Err(AppError::Core(CoreError::Unauthorized(
            "invalid admin token".into(),
        )));
    }

    let hash = match input.password.as_deref() {
        Some(password) if !password.is_empty() => Some(
            hash_password(password)
                .map_err(|e| AppError::InternalError(format!("password hashing failed: {e}")))?,
        ),
        _ => None,
    };
    ShopSettingsRepo::set_pricing_password_hash(&state.pool, &input.shop, hash.as_deref()).await?;
    tracing::info!(shop = %input.shop, cleared = hash.is_none(), "pricing password updated");
    Ok(Json(UnlockResponse {
        unlocked: hash.is_none(),
    }))
}

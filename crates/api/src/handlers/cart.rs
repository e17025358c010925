//! Handler for the save-cart operation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use orderdesk_core::cart::{self, CartLine, QuantityMode, SaveCartTarget};
use orderdesk_db::repositories::{CartRepo, SaveCartOutcome};

use crate::error::AppResult;
use crate::middleware::identity::StorefrontCustomer;
use crate::state::AppState;

/// Request body for `POST /cart/save`.
#[derive(Debug, serde::Deserialize)]
pub struct SaveCartRequest {
    #[serde(flatten)]
    pub target: SaveCartTarget,
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub quantity_mode: QuantityMode,
    pub po_number: String,
    pub company_name: String,
}

/// POST /api/v1/cart/save
///
/// Validates and normalizes the lines, then runs the whole protocol as
/// one transaction. Returns the (possibly copied) target job.
pub async fn save_cart(
    State(state): State<AppState>,
    caller: StorefrontCustomer,
    Json(input): Json<SaveCartRequest>,
) -> AppResult<(StatusCode, Json<SaveCartOutcome>)> {
    cart::validate_save_cart(
        &input.target,
        &input.items,
        &input.po_number,
        &input.company_name,
    )?;
    let lines = cart::normalize_lines(input.items);

    let outcome = CartRepo::save_cart(
        &state.pool,
        &caller.shop,
        caller.customer_id,
        &input.target,
        &lines,
        input.quantity_mode,
        &input.po_number,
        &input.company_name,
    )
    .await?;

    tracing::info!(
        project_id = outcome.project_id,
        job_id = outcome.job_id,
        copied = outcome.copied,
        "cart saved"
    );
    Ok((StatusCode::CREATED, Json(outcome)))
}

//! Storefront identity extractor for Axum handlers.
//!
//! Requests reach this service through the storefront proxy, which has
//! already verified the session and stamps the trusted `x-shop-domain` and
//! `x-customer-id` headers. The proxy handshake itself lives outside this
//! service; here a missing or malformed header simply means the caller
//! must (re)authenticate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use orderdesk_core::error::CoreError;
use orderdesk_core::types::CustomerId;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated (shop, customer) pair extracted from proxy headers.
///
/// Use this as an extractor parameter in any handler that requires an
/// authenticated storefront customer:
///
/// ```ignore
/// async fn my_handler(caller: StorefrontCustomer) -> AppResult<Json<()>> {
///     tracing::info!(shop = %caller.shop, customer_id = caller.customer_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StorefrontCustomer {
    /// Tenant key (the shop's domain).
    pub shop: String,
    /// The verified customer id.
    pub customer_id: CustomerId,
}

impl FromRequestParts<AppState> for StorefrontCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let shop = parts
            .headers
            .get("x-shop-domain")
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing x-shop-domain header".into()))
            })?
            .to_string();

        let customer_id: CustomerId = parts
            .headers
            .get("x-customer-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing or invalid x-customer-id header".into(),
                ))
            })?;

        Ok(StorefrontCustomer { shop, customer_id })
    }
}

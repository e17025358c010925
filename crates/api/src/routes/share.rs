//! Route definitions for share-token redemption.

use axum::routing::post;
use axum::Router;

use crate::handlers::sharing;
use crate::state::AppState;

/// Share routes mounted at `/share`. Minting lives under `/projects`.
///
/// ```text
/// POST   /redeem            -> redeem
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/redeem", post(sharing::redeem))
}

//! Route definitions for the save-cart protocol.

use axum::routing::post;
use axum::Router;

use crate::handlers::cart;
use crate::state::AppState;

/// Cart routes mounted at `/cart`.
///
/// ```text
/// POST   /save              -> save_cart
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/save", post(cart::save_cart))
}

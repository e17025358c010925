//! Per-shop settings model.

use orderdesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Per-tenant settings. `pricing_password_hash` is an argon2id PHC
/// string; NULL means pricing is not gated for that shop.
#[derive(Debug, Clone, FromRow)]
pub struct ShopSettings {
    pub id: DbId,
    pub shop: String,
    pub pricing_password_hash: Option<String>,
    pub updated_at: Timestamp,
}

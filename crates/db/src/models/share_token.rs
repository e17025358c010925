//! Project share-token model.

use orderdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A long-lived invite token. Redemption upserts membership and never
/// consumes the token.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectShareToken {
    pub id: DbId,
    pub project_id: DbId,
    #[serde(skip_serializing)]
    pub token: String,
    pub role: String,
    pub created_at: Timestamp,
}

//! Project membership model.

use orderdesk_core::access::MemberRole;
use orderdesk_core::types::{CustomerId, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A membership row. The project owner never appears here; effective
/// membership is the derived union of the owner and these rows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMember {
    pub id: DbId,
    pub project_id: DbId,
    pub customer_id: CustomerId,
    /// Stored as TEXT (`edit` | `view`), parsed via [`MemberRole::parse`].
    pub role: String,
    pub created_at: Timestamp,
}

impl ProjectMember {
    pub fn member_role(&self) -> Result<MemberRole, orderdesk_core::error::CoreError> {
        MemberRole::parse(&self.role)
    }
}

//! Approval request model.

use orderdesk_core::approval::ApprovalScope;
use orderdesk_core::types::{CustomerId, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An approval request row. NULL `job_id`/`item_id` encode the scope
/// level (see [`ApprovalScope::from_columns`]). `approved_at` set means
/// the row is terminal.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovalRequest {
    pub id: DbId,
    pub project_id: DbId,
    pub job_id: Option<DbId>,
    pub item_id: Option<DbId>,
    pub requested_by: CustomerId,
    pub requested_at: Timestamp,
    pub approved_at: Option<Timestamp>,
    pub approved_by_customer_id: Option<CustomerId>,
}

impl ApprovalRequest {
    pub fn scope(&self) -> ApprovalScope {
        ApprovalScope::from_columns(self.job_id, self.item_id)
    }

    pub fn is_approved(&self) -> bool {
        self.approved_at.is_some()
    }
}

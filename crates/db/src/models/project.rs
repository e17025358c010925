//! Project entity model and DTOs.

use orderdesk_core::types::{CustomerId, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
///
/// The owner is fixed at creation and never transferred; ownership is
/// derived from `owner_customer_id`, never from a membership row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub shop: String,
    pub name: String,
    pub owner_customer_id: CustomerId,
    pub po_number: String,
    pub company_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project directly (outside the save-cart protocol).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub po_number: String,
    pub company_name: String,
}

//! Job ("order") entity model and DTOs.

use orderdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A job row from the `jobs` table.
///
/// `is_locked` here is only the explicit flag; a job is also considered
/// locked when a `job_order_links` row exists. Use
/// [`crate::repositories::JobRepo::is_locked`] for the combined check.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub is_locked: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
}

/// Link to a placed storefront order; its presence locks the job.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobOrderLink {
    pub id: DbId,
    pub job_id: DbId,
    pub external_order_id: String,
    pub created_at: Timestamp,
}

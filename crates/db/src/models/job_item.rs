//! Job line-item model and batch-edit DTOs.

use orderdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A line item row from the `job_items` table. `price_cents` is the
/// snapshot captured when the line was added; it is never refreshed from
/// the catalog except when an add-mode merge overwrites it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobItem {
    pub id: DbId,
    pub job_id: DbId,
    pub variant_id: String,
    pub quantity: i32,
    pub price_cents: i64,
    pub sort_order: i32,
    pub created_at: Timestamp,
}

/// One quantity update within a batch order edit. Quantities must be
/// strictly positive; removal is expressed through
/// [`SaveOrderEdit::remove_item_ids`], never as quantity zero.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemUpdate {
    pub item_id: DbId,
    pub quantity: i32,
}

/// DTO for the batch save-order-edit operation.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveOrderEdit {
    #[serde(default)]
    pub updates: Vec<ItemUpdate>,
    #[serde(default)]
    pub remove_item_ids: Vec<DbId>,
    /// Delete the whole job after applying removals/updates.
    #[serde(default)]
    pub delete_job: bool,
}

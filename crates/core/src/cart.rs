//! Save-cart input validation, normalization, and merge planning.
//!
//! The db layer executes a save-cart call as one transaction; everything
//! decidable without touching the database lives here so the policy is
//! unit-testable.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::types::DbId;

/// One normalized cart line: a variant, a strictly positive quantity, and
/// the price captured at the time of the add (integer cents, never
/// refreshed from the catalog except on an add-mode merge).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CartLine {
    pub variant_id: String,
    pub quantity: i32,
    pub price_cents: i64,
}

/// How incoming lines combine with an existing job's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityMode {
    /// Merge per variant: existing rows gain the incoming quantity and
    /// take the incoming price snapshot; unknown variants append.
    #[default]
    Add,
    /// Drop the job's entire item set and install exactly the incoming
    /// lines, renumbered 1..n.
    Replace,
}

/// Where a save-cart call lands.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SaveCartTarget {
    NewProject { project_name: String, job_name: String },
    ExistingProject { project_id: DbId, job_name: String },
    ExistingJob { project_id: DbId, job_id: DbId },
}

/// Validate the mode-independent preconditions, before any mutation:
/// at least one line, all quantities > 0, non-empty po/company, and
/// non-empty names where the target requires them.
pub fn validate_save_cart(
    target: &SaveCartTarget,
    lines: &[CartLine],
    po_number: &str,
    company_name: &str,
) -> Result<(), CoreError> {
    if lines.is_empty() {
        return Err(CoreError::Validation("at least one line item is required".into()));
    }
    for line in lines {
        if line.variant_id.trim().is_empty() {
            return Err(CoreError::Validation("line item is missing a variant id".into()));
        }
        if line.quantity <= 0 {
            return Err(CoreError::Validation(format!(
                "quantity for variant {} must be positive",
                line.variant_id
            )));
        }
    }
    if po_number.trim().is_empty() {
        return Err(CoreError::Validation("po_number is required".into()));
    }
    if company_name.trim().is_empty() {
        return Err(CoreError::Validation("company_name is required".into()));
    }
    match target {
        SaveCartTarget::NewProject { project_name, job_name } => {
            if project_name.trim().is_empty() {
                return Err(CoreError::Validation("project_name is required".into()));
            }
            if job_name.trim().is_empty() {
                return Err(CoreError::Validation("job_name is required".into()));
            }
        }
        SaveCartTarget::ExistingProject { job_name, .. } => {
            if job_name.trim().is_empty() {
                return Err(CoreError::Validation("job_name is required".into()));
            }
        }
        SaveCartTarget::ExistingJob { .. } => {}
    }
    Ok(())
}

/// Coalesce duplicate variant ids within one submission: quantities sum,
/// the last price snapshot wins, first-seen order is kept.
pub fn normalize_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut order: Vec<String> = Vec::new();
    let mut merged: HashMap<String, CartLine> = HashMap::new();
    for line in lines {
        match merged.get_mut(&line.variant_id) {
            Some(existing) => {
                existing.quantity += line.quantity;
                existing.price_cents = line.price_cents;
            }
            None => {
                order.push(line.variant_id.clone());
                merged.insert(line.variant_id.clone(), line);
            }
        }
    }
    order
        .into_iter()
        .map(|v| merged.remove(&v).expect("normalized line present"))
        .collect()
}

/// One step of an add-mode merge, computed against the target job's
/// current (variant_id -> (item_id, quantity)) map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// Existing row: bump quantity and overwrite the price snapshot.
    Update {
        item_id: DbId,
        new_quantity: i32,
        price_cents: i64,
    },
    /// No row for this variant: append a fresh item.
    Insert(CartLine),
}

/// Plan an add-mode merge. `existing` maps variant_id to the current
/// (item_id, quantity) in the target job.
pub fn plan_merge(
    existing: &HashMap<String, (DbId, i32)>,
    incoming: &[CartLine],
) -> Vec<MergeAction> {
    incoming
        .iter()
        .map(|line| match existing.get(&line.variant_id) {
            Some((item_id, qty)) => MergeAction::Update {
                item_id: *item_id,
                new_quantity: qty + line.quantity,
                price_cents: line.price_cents,
            },
            None => MergeAction::Insert(line.clone()),
        })
        .collect()
}

//! Repository for the `job_items` table.
//!
//! Structural changes to a job's contents invalidate outstanding approval
//! requests: deleting an item removes the parent job's job-level request
//! (item-level requests for the row go with it via FK cascade).

use orderdesk_core::error::CoreError;
use orderdesk_core::ordering;
use orderdesk_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::job_item::{JobItem, SaveOrderEdit};
use crate::repositories::approval_repo::ApprovalRepo;
use crate::repositories::job_repo::JobRepo;
use crate::DbError;

/// Column list for `job_items` queries.
const COLUMNS: &str = "id, job_id, variant_id, quantity, price_cents, sort_order, created_at";

/// Provides item mutations and the batch order-edit operation.
pub struct JobItemRepo;

impl JobItemRepo {
    /// Find an item by id, scoped to a tenant through its job's project.
    pub async fn find_in_shop(
        pool: &PgPool,
        shop: &str,
        id: DbId,
    ) -> Result<Option<JobItem>, sqlx::Error> {
        let query = format!(
            "SELECT i.{} FROM job_items i \
             JOIN jobs j ON j.id = i.job_id \
             JOIN projects p ON p.id = j.project_id \
             WHERE i.id = $1 AND p.shop = $2",
            COLUMNS.replace(", ", ", i.")
        );
        sqlx::query_as::<_, JobItem>(&query)
            .bind(id)
            .bind(shop)
            .fetch_optional(pool)
            .await
    }

    /// Items of a job in display order.
    pub async fn list_by_job(pool: &PgPool, job_id: DbId) -> Result<Vec<JobItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM job_items WHERE job_id = $1 ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, JobItem>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }

    /// Delete one item and the parent job's job-level approval request.
    /// Callers enforce the lock rule first.
    pub async fn delete(pool: &PgPool, item: &JobItem) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM job_items WHERE id = $1")
            .bind(item.id)
            .execute(&mut *tx)
            .await?;
        ApprovalRepo::delete_job_level_in_tx(&mut tx, item.job_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Apply a complete permutation of a job's items atomically. Same
    /// contract as [`JobRepo::reorder`].
    pub async fn reorder(pool: &PgPool, job_id: DbId, ids: &[DbId]) -> Result<(), DbError> {
        let mut tx = pool.begin().await?;
        let current: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM job_items WHERE job_id = $1 ORDER BY id")
                .bind(job_id)
                .fetch_all(&mut *tx)
                .await?;
        ordering::validate_permutation(&current, ids)?;
        for (position, id) in ids.iter().enumerate() {
            sqlx::query("UPDATE job_items SET sort_order = $2 WHERE id = $1")
                .bind(id)
                .bind((position + 1) as i32)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Batch order edit: remove the listed items, apply strictly-positive
    /// quantity updates, optionally delete the whole job afterwards. All
    /// in one transaction.
    ///
    /// Quantity zero is rejected up front; removal is only ever expressed
    /// through `remove_item_ids`.
    pub async fn save_order_edit(
        pool: &PgPool,
        job_id: DbId,
        edit: &SaveOrderEdit,
    ) -> Result<(), DbError> {
        for update in &edit.updates {
            if update.quantity <= 0 {
                return Err(CoreError::Validation(format!(
                    "quantity for item {} must be positive; use remove_item_ids to delete",
                    update.item_id
                ))
                .into());
            }
        }

        let mut tx = pool.begin().await?;

        if JobRepo::is_locked_in_tx(&mut tx, job_id).await? {
            return Err(CoreError::Locked(format!(
                "job {job_id} is locked; copy it to make changes"
            ))
            .into());
        }

        for item_id in &edit.remove_item_ids {
            let removed = sqlx::query("DELETE FROM job_items WHERE id = $1 AND job_id = $2")
                .bind(item_id)
                .bind(job_id)
                .execute(&mut *tx)
                .await?;
            if removed.rows_affected() == 0 {
                return Err(CoreError::NotFound {
                    entity: "JobItem",
                    id: *item_id,
                }
                .into());
            }
        }

        for update in &edit.updates {
            let updated =
                sqlx::query("UPDATE job_items SET quantity = $3 WHERE id = $1 AND job_id = $2")
                    .bind(update.item_id)
                    .bind(job_id)
                    .bind(update.quantity)
                    .execute(&mut *tx)
                    .await?;
            if updated.rows_affected() == 0 {
                return Err(CoreError::NotFound {
                    entity: "JobItem",
                    id: update.item_id,
                }
                .into());
            }
        }

        // Content changed: outstanding job-level approval is stale.
        if !edit.remove_item_ids.is_empty() || !edit.updates.is_empty() {
            ApprovalRepo::delete_job_level_in_tx(&mut tx, job_id).await?;
        }

        if edit.delete_job {
            sqlx::query("DELETE FROM jobs WHERE id = $1")
                .bind(job_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

//! Repository for the `approval_requests` table.
//!
//! One row per exact scope (project / job / item), enforced by the
//! COALESCE unique index. An approved row is terminal: it blocks new
//! requests for the scope until it is deleted through cancel.

use orderdesk_core::approval::ApprovalScope;
use orderdesk_core::error::CoreError;
use orderdesk_core::types::{CustomerId, DbId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::approval::ApprovalRequest;
use crate::DbError;

/// Column list for `approval_requests` queries.
const COLUMNS: &str = "id, project_id, job_id, item_id, requested_by, requested_at, \
     approved_at, approved_by_customer_id";

/// Provides the approval request state transitions.
pub struct ApprovalRepo;

impl ApprovalRepo {
    /// The request at an exact scope, if any.
    pub async fn find_by_scope(
        pool: &PgPool,
        project_id: DbId,
        scope: ApprovalScope,
    ) -> Result<Option<ApprovalRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM approval_requests \
             WHERE project_id = $1 \
               AND job_id IS NOT DISTINCT FROM $2 \
               AND item_id IS NOT DISTINCT FROM $3"
        );
        sqlx::query_as::<_, ApprovalRequest>(&query)
            .bind(project_id)
            .bind(scope.job_id())
            .bind(scope.item_id())
            .fetch_optional(pool)
            .await
    }

    /// Create the request for a scope, or refresh `requested_at` when an
    /// awaiting one already exists (idempotent re-submit). Fails
    /// `AlreadyApproved` when the scope holds a terminal row.
    pub async fn upsert_open(
        pool: &PgPool,
        project_id: DbId,
        scope: ApprovalScope,
        requested_by: CustomerId,
    ) -> Result<ApprovalRequest, DbError> {
        let mut tx = pool.begin().await?;
        let select = format!(
            "SELECT {COLUMNS} FROM approval_requests \
             WHERE project_id = $1 \
               AND job_id IS NOT DISTINCT FROM $2 \
               AND item_id IS NOT DISTINCT FROM $3 \
             FOR UPDATE"
        );
        let existing = sqlx::query_as::<_, ApprovalRequest>(&select)
            .bind(project_id)
            .bind(scope.job_id())
            .bind(scope.item_id())
            .fetch_optional(&mut *tx)
            .await?;

        let request = match existing {
            Some(row) if row.is_approved() => return Err(CoreError::AlreadyApproved.into()),
            Some(row) => {
                let refresh = format!(
                    "UPDATE approval_requests SET requested_at = NOW(), requested_by = $2 \
                     WHERE id = $1 RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, ApprovalRequest>(&refresh)
                    .bind(row.id)
                    .bind(requested_by)
                    .fetch_one(&mut *tx)
                    .await?
            }
            None => {
                let insert = format!(
                    "INSERT INTO approval_requests (project_id, job_id, item_id, requested_by) \
                     VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, ApprovalRequest>(&insert)
                    .bind(project_id)
                    .bind(scope.job_id())
                    .bind(scope.item_id())
                    .bind(requested_by)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };
        tx.commit().await?;
        Ok(request)
    }

    /// First approval sets the terminal fields; a repeat returns the
    /// unchanged row with `already_approved = true` and no side effects.
    pub async fn approve(
        pool: &PgPool,
        request_id: DbId,
        approver: CustomerId,
    ) -> Result<(ApprovalRequest, bool), sqlx::Error> {
        let update = format!(
            "UPDATE approval_requests \
             SET approved_at = NOW(), approved_by_customer_id = $2 \
             WHERE id = $1 AND approved_at IS NULL \
             RETURNING {COLUMNS}"
        );
        if let Some(row) = sqlx::query_as::<_, ApprovalRequest>(&update)
            .bind(request_id)
            .bind(approver)
            .fetch_optional(pool)
            .await?
        {
            return Ok((row, false));
        }
        let select = format!("SELECT {COLUMNS} FROM approval_requests WHERE id = $1");
        let row = sqlx::query_as::<_, ApprovalRequest>(&select)
            .bind(request_id)
            .fetch_one(pool)
            .await?;
        Ok((row, true))
    }

    /// Delete the row at a scope (cancel / reject). Returns whether a row
    /// existed.
    pub async fn delete(pool: &PgPool, request_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM approval_requests WHERE id = $1")
            .bind(request_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Drop a pending project-level request; called when a job's contents
    /// change and a blanket approval request is therefore stale.
    pub async fn delete_project_level_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "DELETE FROM approval_requests \
             WHERE project_id = $1 AND job_id IS NULL AND approved_at IS NULL",
        )
        .bind(project_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Drop a pending job-level request; called when one of the job's
    /// items is deleted or edited.
    pub async fn delete_job_level_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        job_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "DELETE FROM approval_requests \
             WHERE job_id = $1 AND item_id IS NULL AND approved_at IS NULL",
        )
        .bind(job_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Every request in a project, for the detail read path.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ApprovalRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM approval_requests WHERE project_id = $1 \
             ORDER BY requested_at ASC, id ASC"
        );
        sqlx::query_as::<_, ApprovalRequest>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}

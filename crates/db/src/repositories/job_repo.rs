//! Repository for the `jobs` table.
//!
//! Job name uniqueness is case-insensitive per project and checked here
//! at creation time (application-level, not a DB constraint). Lock state
//! combines the explicit `is_locked` flag with the presence of a
//! `job_order_links` row.

use orderdesk_core::error::CoreError;
use orderdesk_core::naming;
use orderdesk_core::ordering;
use orderdesk_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::job::{Job, JobOrderLink};
use crate::DbError;

/// Column list for `jobs` queries.
const COLUMNS: &str = "id, project_id, name, is_locked, sort_order, created_at";

/// Provides CRUD, lock checks, reorder, move and copy for jobs.
pub struct JobRepo;

impl JobRepo {
    /// Create an empty job at the next sort order, enforcing the
    /// case-insensitive name uniqueness rule.
    pub async fn create(pool: &PgPool, project_id: DbId, name: &str) -> Result<Job, DbError> {
        let mut tx = pool.begin().await?;
        let job = Self::create_in_tx(&mut tx, project_id, name).await?;
        tx.commit().await?;
        Ok(job)
    }

    /// Transactional job creation used by the save-cart protocol.
    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        name: &str,
    ) -> Result<Job, DbError> {
        let existing: Vec<String> =
            sqlx::query_scalar("SELECT name FROM jobs WHERE project_id = $1")
                .bind(project_id)
                .fetch_all(&mut **tx)
                .await?;
        if naming::is_duplicate_job_name(&existing, name) {
            return Err(CoreError::Validation(format!(
                "a job named '{name}' already exists in this project"
            ))
            .into());
        }
        let next = Self::next_sort_order_in_tx(tx, project_id).await?;
        let query = format!(
            "INSERT INTO jobs (project_id, name, sort_order) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Job>(&query)
            .bind(project_id)
            .bind(name)
            .bind(next)
            .fetch_one(&mut **tx)
            .await?)
    }

    async fn next_sort_order_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        let max: Option<i32> =
            sqlx::query_scalar("SELECT MAX(sort_order) FROM jobs WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(&mut **tx)
                .await?;
        Ok(ordering::next_sort_order(max))
    }

    /// Find a job by id, scoped to a tenant through its project.
    pub async fn find_in_shop(
        pool: &PgPool,
        shop: &str,
        id: DbId,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "SELECT j.{} FROM jobs j \
             JOIN projects p ON p.id = j.project_id \
             WHERE j.id = $1 AND p.shop = $2",
            COLUMNS.replace(", ", ", j.")
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(shop)
            .fetch_optional(pool)
            .await
    }

    /// Jobs of a project in display order.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs WHERE project_id = $1 ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Combined lock check: explicit flag OR an associated order link.
    pub async fn is_locked(pool: &PgPool, job_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT j.is_locked OR EXISTS ( \
                 SELECT 1 FROM job_order_links l WHERE l.job_id = j.id \
             ) FROM jobs j WHERE j.id = $1",
        )
        .bind(job_id)
        .fetch_one(pool)
        .await
    }

    pub async fn is_locked_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        job_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT j.is_locked OR EXISTS ( \
                 SELECT 1 FROM job_order_links l WHERE l.job_id = j.id \
             ) FROM jobs j WHERE j.id = $1",
        )
        .bind(job_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Explicitly freeze or unfreeze a job.
    pub async fn set_locked(pool: &PgPool, job_id: DbId, locked: bool) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET is_locked = $2 WHERE id = $1")
            .bind(job_id)
            .bind(locked)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Associate a placed storefront order with a job, locking it.
    pub async fn link_order(
        pool: &PgPool,
        job_id: DbId,
        external_order_id: &str,
    ) -> Result<JobOrderLink, sqlx::Error> {
        sqlx::query_as::<_, JobOrderLink>(
            "INSERT INTO job_order_links (job_id, external_order_id) VALUES ($1, $2) \
             RETURNING id, job_id, external_order_id, created_at",
        )
        .bind(job_id)
        .bind(external_order_id)
        .fetch_one(pool)
        .await
    }

    /// Delete a job; items and order link cascade. Callers enforce the
    /// lock rule first. Returns whether a row existed.
    pub async fn delete(pool: &PgPool, job_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a complete permutation of the project's jobs as one atomic
    /// batch. Fails `InvalidOrder` when the submitted set does not match
    /// the current membership, leaving sort order untouched.
    pub async fn reorder(pool: &PgPool, project_id: DbId, ids: &[DbId]) -> Result<(), DbError> {
        let mut tx = pool.begin().await?;
        let current: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM jobs WHERE project_id = $1 ORDER BY id")
                .bind(project_id)
                .fetch_all(&mut *tx)
                .await?;
        ordering::validate_permutation(&current, ids)?;
        for (position, id) in ids.iter().enumerate() {
            sqlx::query("UPDATE jobs SET sort_order = $2 WHERE id = $1")
                .bind(id)
                .bind((position + 1) as i32)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Reassign a job to another project, appending it at the
    /// destination's next sort order. Job- and item-scoped approval
    /// requests travel with the job.
    pub async fn move_to_project(
        pool: &PgPool,
        job_id: DbId,
        dest_project_id: DbId,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        let max: Option<i32> =
            sqlx::query_scalar("SELECT MAX(sort_order) FROM jobs WHERE project_id = $1")
                .bind(dest_project_id)
                .fetch_one(&mut *tx)
                .await?;
        sqlx::query("UPDATE jobs SET project_id = $2, sort_order = $3 WHERE id = $1")
            .bind(job_id)
            .bind(dest_project_id)
            .bind(ordering::next_sort_order(max))
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE approval_requests SET project_id = $2 WHERE job_id = $1")
            .bind(job_id)
            .bind(dest_project_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Duplicate a job and its items into another project: fresh ids,
    /// unlocked, appended at the destination's next sort order. Item sort
    /// orders are preserved. The original is untouched.
    pub async fn copy_to_project(
        pool: &PgPool,
        job_id: DbId,
        dest_project_id: DbId,
    ) -> Result<Job, DbError> {
        let mut tx = pool.begin().await?;
        let copy = Self::duplicate_in_tx(&mut tx, job_id, dest_project_id, None).await?;
        tx.commit().await?;
        Ok(copy)
    }

    /// Duplicate `job_id` into `dest_project_id` inside an open
    /// transaction. `name_override` is used by the copy-on-write path to
    /// apply the " (Copy)" suffix. The copy's name is uniquified against
    /// the destination's jobs, so repeated duplication yields
    /// " (Copy 2)", " (Copy 3)" and so on instead of a collision.
    pub async fn duplicate_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        job_id: DbId,
        dest_project_id: DbId,
        name_override: Option<&str>,
    ) -> Result<Job, DbError> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        let source = sqlx::query_as::<_, Job>(&query)
            .bind(job_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Job",
                id: job_id,
            })?;

        let existing: Vec<String> =
            sqlx::query_scalar("SELECT name FROM jobs WHERE project_id = $1")
                .bind(dest_project_id)
                .fetch_all(&mut **tx)
                .await?;
        let name = naming::unique_job_name(&existing, name_override.unwrap_or(&source.name));

        let next = Self::next_sort_order_in_tx(tx, dest_project_id).await?;
        let insert = format!(
            "INSERT INTO jobs (project_id, name, is_locked, sort_order) \
             VALUES ($1, $2, FALSE, $3) \
             RETURNING {COLUMNS}"
        );
        let copy = sqlx::query_as::<_, Job>(&insert)
            .bind(dest_project_id)
            .bind(&name)
            .bind(next)
            .fetch_one(&mut **tx)
            .await?;

        sqlx::query(
            "INSERT INTO job_items (job_id, variant_id, quantity, price_cents, sort_order) \
             SELECT $2, variant_id, quantity, price_cents, sort_order \
             FROM job_items WHERE job_id = $1",
        )
        .bind(job_id)
        .bind(copy.id)
        .execute(&mut **tx)
        .await?;

        Ok(copy)
    }
}

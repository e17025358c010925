//! The save-cart protocol: one transaction that turns a set of normalized
//! cart lines into a committed job.
//!
//! Three target modes (new project / existing project / existing job),
//! copy-on-write for locked jobs, and the add/replace quantity policies.
//! The caller validates and normalizes input via `orderdesk_core::cart`
//! before invoking [`CartRepo::save_cart`]; everything after that point
//! commits or rolls back as a unit.

use std::collections::HashMap;

use orderdesk_core::access::{self, effective_role, MemberRole};
use orderdesk_core::cart::{plan_merge, CartLine, MergeAction, QuantityMode, SaveCartTarget};
use orderdesk_core::error::CoreError;
use orderdesk_core::naming;
use orderdesk_core::types::{CustomerId, DbId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::job::Job;
use crate::models::project::{CreateProject, Project};
use crate::repositories::approval_repo::ApprovalRepo;
use crate::repositories::job_repo::JobRepo;
use crate::repositories::project_repo::ProjectRepo;
use crate::DbError;

/// Result of a save-cart call. `copied` is set when a locked target job
/// forced the copy-on-write path; `job_id` then names the copy.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SaveCartOutcome {
    pub project_id: DbId,
    pub job_id: DbId,
    pub copied: bool,
}

/// Executes the save-cart protocol.
pub struct CartRepo;

impl CartRepo {
    /// Commit a set of cart lines to the target. `lines` must already be
    /// validated and normalized (positive quantities, coalesced variants).
    pub async fn save_cart(
        pool: &PgPool,
        shop: &str,
        customer_id: CustomerId,
        target: &SaveCartTarget,
        lines: &[CartLine],
        quantity_mode: QuantityMode,
        po_number: &str,
        company_name: &str,
    ) -> Result<SaveCartOutcome, DbError> {
        let mut tx = pool.begin().await?;
        let outcome = match target {
            SaveCartTarget::NewProject {
                project_name,
                job_name,
            } => {
                Self::into_new_project(
                    &mut tx,
                    shop,
                    customer_id,
                    project_name,
                    job_name,
                    lines,
                    po_number,
                    company_name,
                )
                .await?
            }
            SaveCartTarget::ExistingProject {
                project_id,
                job_name,
            } => {
                let project =
                    Self::editable_project(&mut tx, shop, customer_id, *project_id).await?;
                let job = JobRepo::create_in_tx(&mut tx, project.id, job_name).await?;
                Self::insert_lines(&mut tx, job.id, lines, 1).await?;
                ProjectRepo::update_details_in_tx(&mut tx, project.id, po_number, company_name)
                    .await?;
                SaveCartOutcome {
                    project_id: project.id,
                    job_id: job.id,
                    copied: false,
                }
            }
            SaveCartTarget::ExistingJob { project_id, job_id } => {
                let project =
                    Self::editable_project(&mut tx, shop, customer_id, *project_id).await?;
                Self::into_existing_job(
                    &mut tx,
                    &project,
                    *job_id,
                    lines,
                    quantity_mode,
                    po_number,
                    company_name,
                )
                .await?
            }
        };
        tx.commit().await?;
        Ok(outcome)
    }

    #[allow(clippy::too_many_arguments)]
    async fn into_new_project(
        tx: &mut Transaction<'_, Postgres>,
        shop: &str,
        customer_id: CustomerId,
        project_name: &str,
        job_name: &str,
        lines: &[CartLine],
        po_number: &str,
        company_name: &str,
    ) -> Result<SaveCartOutcome, DbError> {
        let project = ProjectRepo::create_in_tx(
            tx,
            shop,
            customer_id,
            &CreateProject {
                name: project_name.to_string(),
                po_number: po_number.to_string(),
                company_name: company_name.to_string(),
            },
        )
        .await?;
        let job = JobRepo::create_in_tx(tx, project.id, job_name).await?;
        Self::insert_lines(tx, job.id, lines, 1).await?;
        Ok(SaveCartOutcome {
            project_id: project.id,
            job_id: job.id,
            copied: false,
        })
    }

    async fn into_existing_job(
        tx: &mut Transaction<'_, Postgres>,
        project: &Project,
        job_id: DbId,
        lines: &[CartLine],
        quantity_mode: QuantityMode,
        po_number: &str,
        company_name: &str,
    ) -> Result<SaveCartOutcome, DbError> {
        let select = "SELECT id, project_id, name, is_locked, sort_order, created_at \
             FROM jobs WHERE id = $1 AND project_id = $2";
        let job = sqlx::query_as::<_, Job>(select)
            .bind(job_id)
            .bind(project.id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Job",
                id: job_id,
            })?;

        // Copy-on-write: a locked job is never edited in place. All
        // further mutation in this call targets the unlocked copy.
        let (target_job_id, copied) = if JobRepo::is_locked_in_tx(tx, job.id).await? {
            let copy = JobRepo::duplicate_in_tx(
                tx,
                job.id,
                project.id,
                Some(&naming::copy_job_name(&job.name)),
            )
            .await?;
            (copy.id, true)
        } else {
            (job.id, false)
        };

        match quantity_mode {
            QuantityMode::Replace => {
                sqlx::query("DELETE FROM job_items WHERE job_id = $1")
                    .bind(target_job_id)
                    .execute(&mut **tx)
                    .await?;
                Self::insert_lines(tx, target_job_id, lines, 1).await?;
            }
            QuantityMode::Add => {
                Self::merge_lines(tx, target_job_id, lines).await?;
            }
        }

        // A structural change invalidates an outstanding blanket request.
        ApprovalRepo::delete_project_level_in_tx(tx, project.id).await?;
        ProjectRepo::update_details_in_tx(tx, project.id, po_number, company_name).await?;

        Ok(SaveCartOutcome {
            project_id: project.id,
            job_id: target_job_id,
            copied,
        })
    }

    /// Add-mode merge: existing variants gain quantity and take the
    /// incoming price snapshot; new variants append at the next sort order.
    async fn merge_lines(
        tx: &mut Transaction<'_, Postgres>,
        job_id: DbId,
        lines: &[CartLine],
    ) -> Result<(), sqlx::Error> {
        let rows: Vec<(DbId, String, i32)> =
            sqlx::query_as("SELECT id, variant_id, quantity FROM job_items WHERE job_id = $1")
                .bind(job_id)
                .fetch_all(&mut **tx)
                .await?;
        let existing: HashMap<String, (DbId, i32)> = rows
            .into_iter()
            .map(|(id, variant, qty)| (variant, (id, qty)))
            .collect();

        let max: Option<i32> =
            sqlx::query_scalar("SELECT MAX(sort_order) FROM job_items WHERE job_id = $1")
                .bind(job_id)
                .fetch_one(&mut **tx)
                .await?;
        let mut next = orderdesk_core::ordering::next_sort_order(max);

        for action in plan_merge(&existing, lines) {
            match action {
                MergeAction::Update {
                    item_id,
                    new_quantity,
                    price_cents,
                } => {
                    sqlx::query(
                        "UPDATE job_items SET quantity = $2, price_cents = $3 WHERE id = $1",
                    )
                    .bind(item_id)
                    .bind(new_quantity)
                    .bind(price_cents)
                    .execute(&mut **tx)
                    .await?;
                }
                MergeAction::Insert(line) => {
                    Self::insert_line(tx, job_id, &line, next).await?;
                    next += 1;
                }
            }
        }
        Ok(())
    }

    async fn insert_lines(
        tx: &mut Transaction<'_, Postgres>,
        job_id: DbId,
        lines: &[CartLine],
        first_sort_order: i32,
    ) -> Result<(), sqlx::Error> {
        for (offset, line) in lines.iter().enumerate() {
            Self::insert_line(tx, job_id, line, first_sort_order + offset as i32).await?;
        }
        Ok(())
    }

    async fn insert_line(
        tx: &mut Transaction<'_, Postgres>,
        job_id: DbId,
        line: &CartLine,
        sort_order: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO job_items (job_id, variant_id, quantity, price_cents, sort_order) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(job_id)
        .bind(&line.variant_id)
        .bind(line.quantity)
        .bind(line.price_cents)
        .bind(sort_order)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Resolve a project inside the transaction and require edit access
    /// for the caller, failing `NotFound` / `Forbidden` respectively.
    async fn editable_project(
        tx: &mut Transaction<'_, Postgres>,
        shop: &str,
        customer_id: CustomerId,
        project_id: DbId,
    ) -> Result<Project, DbError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, shop, name, owner_customer_id, po_number, company_name, \
                    created_at, updated_at \
             FROM projects WHERE id = $1 AND shop = $2",
        )
        .bind(project_id)
        .bind(shop)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;

        let rows: Vec<(CustomerId, String)> =
            sqlx::query_as("SELECT customer_id, role FROM project_members WHERE project_id = $1")
                .bind(project.id)
                .fetch_all(&mut **tx)
                .await?;
        let mut members: Vec<(CustomerId, MemberRole)> = Vec::with_capacity(rows.len());
        for (id, role) in rows {
            members.push((id, MemberRole::parse(&role)?));
        }
        access::require_edit(effective_role(
            project.owner_customer_id,
            &members,
            customer_id,
        ))?;
        Ok(project)
    }
}

//! Repository for the `projects` table.

use orderdesk_core::access::{effective_role, MemberRole, Role};
use orderdesk_core::types::{CustomerId, DbId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::member::ProjectMember;
use crate::models::project::{CreateProject, Project};
use crate::DbError;

/// Column list for `projects` queries.
const COLUMNS: &str =
    "id, shop, name, owner_customer_id, po_number, company_name, created_at, updated_at";

/// Provides CRUD and access-resolution for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Create a project owned by `owner_customer_id`.
    pub async fn create(
        pool: &PgPool,
        shop: &str,
        owner_customer_id: CustomerId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let project =
            Self::create_in_tx(&mut tx, shop, owner_customer_id, input).await?;
        tx.commit().await?;
        Ok(project)
    }

    /// Create a project within an open transaction (used by the save-cart
    /// protocol so project + job + items commit together).
    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        shop: &str,
        owner_customer_id: CustomerId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (shop, name, owner_customer_id, po_number, company_name) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(shop)
            .bind(&input.name)
            .bind(owner_customer_id)
            .bind(&input.po_number)
            .bind(&input.company_name)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a project by id within a tenant.
    pub async fn find_in_shop(
        pool: &PgPool,
        shop: &str,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND shop = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(shop)
            .fetch_optional(pool)
            .await
    }

    /// Projects the customer can see: owned or member-of, newest first.
    pub async fn list_for_customer(
        pool: &PgPool,
        shop: &str,
        customer_id: CustomerId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT p.{} FROM projects p \
             LEFT JOIN project_members m ON m.project_id = p.id \
             WHERE p.shop = $1 AND (p.owner_customer_id = $2 OR m.customer_id = $2) \
             ORDER BY p.created_at DESC, p.id DESC",
            COLUMNS.replace(", ", ", p.")
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(shop)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the project's PO number and company name (last-write-wins,
    /// see the save-cart protocol).
    pub async fn update_details_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        po_number: &str,
        company_name: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE projects SET po_number = $2, company_name = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(po_number)
        .bind(company_name)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Delete a project; jobs, items, members, tokens and approval
    /// requests go with it via FK cascade. Returns whether a row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All membership rows for a project.
    pub async fn members(pool: &PgPool, project_id: DbId) -> Result<Vec<ProjectMember>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMember>(
            "SELECT id, project_id, customer_id, role, created_at \
             FROM project_members WHERE project_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Effective role of a customer on a project (owner derived, members
    /// from their rows).
    pub async fn role_of(
        pool: &PgPool,
        project: &Project,
        customer_id: CustomerId,
    ) -> Result<Option<Role>, DbError> {
        let members = Self::members(pool, project.id).await?;
        let mut pairs: Vec<(CustomerId, MemberRole)> = Vec::with_capacity(members.len());
        for m in &members {
            pairs.push((m.customer_id, m.member_role()?));
        }
        Ok(effective_role(project.owner_customer_id, &pairs, customer_id))
    }

    /// Effective member ids: the owner plus every membership row.
    pub async fn effective_member_ids(
        pool: &PgPool,
        project: &Project,
    ) -> Result<Vec<CustomerId>, sqlx::Error> {
        let members = Self::members(pool, project.id).await?;
        let mut ids = vec![project.owner_customer_id];
        for m in members {
            if m.customer_id != project.owner_customer_id {
                ids.push(m.customer_id);
            }
        }
        Ok(ids)
    }
}

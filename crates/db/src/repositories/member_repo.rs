//! Repository for the `project_members` table.

use orderdesk_core::access::MemberRole;
use orderdesk_core::types::{CustomerId, DbId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::member::ProjectMember;

const COLUMNS: &str = "id, project_id, customer_id, role, created_at";

/// Provides membership mutations. The owner never gets a row here;
/// callers guard that invariant.
pub struct MemberRepo;

impl MemberRepo {
    /// Insert or refresh a membership. Redeeming a share token twice, or
    /// re-adding an existing member, just updates the role.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        customer_id: CustomerId,
        role: MemberRole,
    ) -> Result<ProjectMember, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let member = Self::upsert_in_tx(&mut tx, project_id, customer_id, role).await?;
        tx.commit().await?;
        Ok(member)
    }

    pub async fn upsert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        customer_id: CustomerId,
        role: MemberRole,
    ) -> Result<ProjectMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_members (project_id, customer_id, role) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_project_members_project_customer \
             DO UPDATE SET role = EXCLUDED.role \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .bind(customer_id)
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Remove a member. Returns whether a row existed.
    pub async fn remove(
        pool: &PgPool,
        project_id: DbId,
        customer_id: CustomerId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND customer_id = $2")
                .bind(project_id)
                .bind(customer_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

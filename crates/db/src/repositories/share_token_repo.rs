//! Repository for the `project_share_tokens` table.
//!
//! Tokens are long-lived invites: 32 random bytes hex-encoded (256 bits),
//! never consumed or expired. Redemption upserts membership and is
//! idempotent for repeat redeemers.

use orderdesk_core::access::MemberRole;
use orderdesk_core::error::CoreError;
use orderdesk_core::types::{CustomerId, DbId};
use rand::RngCore;
use sqlx::PgPool;

use crate::models::project::Project;
use crate::models::share_token::ProjectShareToken;
use crate::repositories::member_repo::MemberRepo;
use crate::DbError;

const COLUMNS: &str = "id, project_id, token, role, created_at";

/// Token length in random bytes before hex encoding.
const TOKEN_BYTES: usize = 32;

/// Provides share-token minting and redemption.
pub struct ShareTokenRepo;

impl ShareTokenRepo {
    /// Mint an unguessable token granting `role` on the project.
    pub async fn mint(
        pool: &PgPool,
        project_id: DbId,
        role: MemberRole,
    ) -> Result<ProjectShareToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_share_tokens (project_id, token, role) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectShareToken>(&query)
            .bind(project_id)
            .bind(generate_token())
            .bind(role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Redeem a token for the calling customer: resolve it within the
    /// tenant and upsert a membership with the token's role. The project
    /// owner redeeming their own invite is a no-op (owners never get a
    /// membership row).
    pub async fn redeem(
        pool: &PgPool,
        shop: &str,
        token: &str,
        customer_id: CustomerId,
    ) -> Result<Project, DbError> {
        let row = sqlx::query_as::<_, ProjectShareToken>(&format!(
            "SELECT t.{} FROM project_share_tokens t \
             JOIN projects p ON p.id = t.project_id \
             WHERE t.token = $1 AND p.shop = $2",
            COLUMNS.replace(", ", ", t.")
        ))
        .bind(token)
        .bind(shop)
        .fetch_optional(pool)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ShareToken",
            id: 0,
        })?;

        let project = sqlx::query_as::<_, Project>(
            "SELECT id, shop, name, owner_customer_id, po_number, company_name, \
                    created_at, updated_at \
             FROM projects WHERE id = $1",
        )
        .bind(row.project_id)
        .fetch_one(pool)
        .await?;

        if project.owner_customer_id != customer_id {
            let role = MemberRole::parse(&row.role)?;
            MemberRepo::upsert(pool, project.id, customer_id, role).await?;
        }
        Ok(project)
    }
}

/// 256 bits of CSPRNG output, hex-encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

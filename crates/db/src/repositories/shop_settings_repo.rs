//! Repository for the `shop_settings` table.

use sqlx::PgPool;

use crate::models::shop_settings::ShopSettings;

const COLUMNS: &str = "id, shop, pricing_password_hash, updated_at";

/// Provides per-tenant settings access.
pub struct ShopSettingsRepo;

impl ShopSettingsRepo {
    /// Settings for a shop, if any have been stored.
    pub async fn find(pool: &PgPool, shop: &str) -> Result<Option<ShopSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shop_settings WHERE shop = $1");
        sqlx::query_as::<_, ShopSettings>(&query)
            .bind(shop)
            .fetch_optional(pool)
            .await
    }

    /// Set (or clear, with `None`) the pricing password hash for a shop.
    pub async fn set_pricing_password_hash(
        pool: &PgPool,
        shop: &str,
        hash: Option<&str>,
    ) -> Result<ShopSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO shop_settings (shop, pricing_password_hash) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_shop_settings_shop \
             DO UPDATE SET pricing_password_hash = EXCLUDED.pricing_password_hash, \
                           updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShopSettings>(&query)
            .bind(shop)
            .bind(hash)
            .fetch_one(pool)
            .await
    }
}

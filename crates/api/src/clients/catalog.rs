//! Variant catalog lookup.

use std::collections::HashMap;

use async_trait::async_trait;
use orderdesk_core::error::CoreError;
use serde::Deserialize;

/// Display metadata for one product variant.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct VariantInfo {
    pub title: String,
    pub product_title: String,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub product_handle: Option<String>,
}

impl VariantInfo {
    /// Placeholder used when the catalog is unreachable or does not know
    /// the variant. Read paths render this instead of failing.
    pub fn placeholder(variant_id: &str) -> Self {
        Self {
            title: format!("Variant {variant_id}"),
            product_title: format!("Variant {variant_id}"),
            image_url: None,
            image_alt: None,
            product_handle: None,
        }
    }
}

/// Maps variant ids to display metadata. Lookups may partially fail: ids
/// missing from the returned map get placeholders at the call site.
#[async_trait]
pub trait VariantCatalog: Send + Sync {
    async fn lookup(
        &self,
        shop: &str,
        variant_ids: &[String],
    ) -> Result<HashMap<String, VariantInfo>, CoreError>;
}

/// Catalog client backed by the storefront platform API.
pub struct HttpVariantCatalog {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpVariantCatalog {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }
}

#[async_trait]
impl VariantCatalog for HttpVariantCatalog {
    async fn lookup(
        &self,
        shop: &str,
        variant_ids: &[String],
    ) -> Result<HashMap<String, VariantInfo>, CoreError> {
        if variant_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let url = format!("{}/shops/{shop}/variants", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("ids", variant_ids.join(","))])
            .send()
            .await
            .map_err(|e| CoreError::Dependency(format!("catalog lookup failed: {e}")))?;
        if !response.status().is_success() {
            return Err(CoreError::Dependency(format!(
                "catalog lookup returned {}",
                response.status()
            )));
        }
        response
            .json::<HashMap<String, VariantInfo>>()
            .await
            .map_err(|e| CoreError::Dependency(format!("catalog response malformed: {e}")))
    }
}

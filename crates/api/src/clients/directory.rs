//! Customer directory lookup.

use std::collections::HashMap;

use async_trait::async_trait;
use orderdesk_core::error::CoreError;
use orderdesk_core::types::CustomerId;
use serde::Deserialize;

/// Profile data for one storefront customer.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct CustomerProfile {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CustomerProfile {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.email.clone(),
        }
    }
}

/// Maps customer ids to profiles and resolves emails back to ids.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn lookup(
        &self,
        shop: &str,
        customer_ids: &[CustomerId],
    ) -> Result<HashMap<CustomerId, CustomerProfile>, CoreError>;

    async fn find_customer_id_by_email(
        &self,
        shop: &str,
        email: &str,
    ) -> Result<Option<CustomerId>, CoreError>;
}

/// Directory client backed by the storefront platform API.
pub struct HttpMemberDirectory {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpMemberDirectory {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }
}

#[async_trait]
impl MemberDirectory for HttpMemberDirectory {
    async fn lookup(
        &self,
        shop: &str,
        customer_ids: &[CustomerId],
    ) -> Result<HashMap<CustomerId, CustomerProfile>, CoreError> {
        if customer_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids = customer_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/shops/{shop}/customers", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("ids", ids)])
            .send()
            .await
            .map_err(|e| CoreError::Dependency(format!("customer lookup failed: {e}")))?;
        if !response.status().is_success() {
            return Err(CoreError::Dependency(format!(
                "customer lookup returned {}",
                response.status()
            )));
        }
        response
            .json::<HashMap<CustomerId, CustomerProfile>>()
            .await
            .map_err(|e| CoreError::Dependency(format!("customer response malformed: {e}")))
    }

    async fn find_customer_id_by_email(
        &self,
        shop: &str,
        email: &str,
    ) -> Result<Option<CustomerId>, CoreError> {
        let url = format!("{}/shops/{shop}/customers/by-email", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("email", email)])
            .send()
            .await
            .map_err(|e| CoreError::Dependency(format!("customer lookup failed: {e}")))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CoreError::Dependency(format!(
                "customer lookup returned {}",
                response.status()
            )));
        }
        #[derive(Deserialize)]
        struct ByEmail {
            customer_id: Option<CustomerId>,
        }
        let body: ByEmail = response
            .json()
            .await
            .map_err(|e| CoreError::Dependency(format!("customer response malformed: {e}")))?;
        Ok(body.customer_id)
    }
}

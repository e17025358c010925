#![allow(dead_code)]

//! Shared harness for HTTP-level integration tests.
//!
//! Builds the production router (same middleware stack as `main.rs`) on
//! top of stub storefront clients, so tests exercise real routing, JSON
//! codecs and error mapping without a live platform API or SMTP server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use orderdesk_api::clients::catalog::{VariantCatalog, VariantInfo};
use orderdesk_api::clients::directory::{CustomerProfile, MemberDirectory};
use orderdesk_api::config::ServerConfig;
use orderdesk_api::notifications::Notifier;
use orderdesk_api::router::build_app_router;
use orderdesk_api::state::AppState;
use orderdesk_core::error::CoreError;
use orderdesk_core::types::CustomerId;

/// Tenant used by every test.
pub const SHOP: &str = "acme.example-shop.com";

/// Seed customers known to the stub directory.
pub const OWNER: CustomerId = 100;
pub const EDITOR: CustomerId = 200;
pub const VIEWER: CustomerId = 300;
pub const NON_APPROVER: CustomerId = 400;
pub const STRANGER: CustomerId = 999;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_base_url: "http://localhost:3000".to_string(),
        storefront_api_base: "http://localhost:4000".to_string(),
        storefront_api_token: String::new(),
        admin_api_token: Some(ADMIN_TOKEN.to_string()),
        email: None,
    }
}

/// Catalog stub: knows every variant, titles them `Widget <id>`.
pub struct StubCatalog;

#[async_trait]
impl VariantCatalog for StubCatalog {
    async fn lookup(
        &self,
        _shop: &str,
        variant_ids: &[String],
    ) -> Result<HashMap<String, VariantInfo>, CoreError> {
        Ok(variant_ids
            .iter()
            .map(|id| {
                (
                    id.clone(),
                    VariantInfo {
                        title: format!("Widget {id}"),
                        product_title: format!("Widget {id}"),
                        image_url: None,
                        image_alt: None,
                        product_handle: None,
                    },
                )
            })
            .collect())
    }
}

/// Catalog stub that always fails, for degradation tests.
pub struct DownCatalog;

#[async_trait]
impl VariantCatalog for DownCatalog {
    async fn lookup(
        &self,
        _shop: &str,
        _variant_ids: &[String],
    ) -> Result<HashMap<String, VariantInfo>, CoreError> {
        Err(CoreError::Dependency("catalog unavailable".into()))
    }
}

/// Directory stub backed by a fixed profile table.
pub struct StubDirectory {
    profiles: HashMap<CustomerId, CustomerProfile>,
}

impl StubDirectory {
    pub fn with_default_profiles() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(OWNER, profile("owner@example.com", &[]));
        profiles.insert(EDITOR, profile("editor@example.com", &[]));
        profiles.insert(VIEWER, profile("viewer@example.com", &[]));
        profiles.insert(NON_APPROVER, profile("na@example.com", &["NA"]));
        Self { profiles }
    }
}

fn profile(email: &str, tags: &[&str]) -> CustomerProfile {
    CustomerProfile {
        email: email.to_string(),
        first_name: None,
        last_name: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[async_trait]
impl MemberDirectory for StubDirectory {
    async fn lookup(
        &self,
        _shop: &str,
        customer_ids: &[CustomerId],
    ) -> Result<HashMap<CustomerId, CustomerProfile>, CoreError> {
        Ok(customer_ids
            .iter()
            .filter_map(|id| self.profiles.get(id).map(|p| (*id, p.clone())))
            .collect())
    }

    async fn find_customer_id_by_email(
        &self,
        _shop: &str,
        email: &str,
    ) -> Result<Option<CustomerId>, CoreError> {
        Ok(self
            .profiles
            .iter()
            .find(|(_, p)| p.email.eq_ignore_ascii_case(email))
            .map(|(id, _)| *id))
    }
}

/// Directory stub that resolves nobody, for fail-closed checks.
pub struct EmptyDirectory;

#[async_trait]
impl MemberDirectory for EmptyDirectory {
    async fn lookup(
        &self,
        _shop: &str,
        _customer_ids: &[CustomerId],
    ) -> Result<HashMap<CustomerId, CustomerProfile>, CoreError> {
        Ok(HashMap::new())
    }

    async fn find_customer_id_by_email(
        &self,
        _shop: &str,
        _email: &str,
    ) -> Result<Option<CustomerId>, CoreError> {
        Ok(None)
    }
}

/// One captured outbound email.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Notifier that records every send instead of talking SMTP.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentEmail>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), CoreError> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Notifier whose sends always fail, for submit-failure tests.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), CoreError> {
        Err(CoreError::Dependency("smtp unavailable".into()))
    }
}

/// Build the full application router with the default stubs and a
/// recording notifier.
pub fn build_test_app(pool: PgPool) -> Router {
    let (app, _notifier) = build_test_app_recording(pool);
    app
}

/// Same as [`build_test_app`] but hands back the notifier log.
pub fn build_test_app_recording(pool: PgPool) -> (Router, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let app = build_app_with(
        pool,
        Arc::new(StubCatalog),
        Some(notifier.clone() as Arc<dyn Notifier>),
    );
    (app, notifier)
}

/// Router with notifications unconfigured (submit must refuse).
pub fn build_test_app_without_notifier(pool: PgPool) -> Router {
    build_app_with(pool, Arc::new(StubCatalog), None)
}

/// Router whose notifier fails every send.
pub fn build_test_app_failing_notifier(pool: PgPool) -> Router {
    build_app_with(pool, Arc::new(StubCatalog), Some(Arc::new(FailingNotifier)))
}

/// Router whose catalog is down, for placeholder-degradation tests.
pub fn build_test_app_catalog_down(pool: PgPool) -> Router {
    build_app_with(pool, Arc::new(DownCatalog), None)
}

/// Router whose directory resolves no profiles at all.
pub fn build_test_app_empty_directory(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        catalog: Arc::new(StubCatalog),
        directory: Arc::new(EmptyDirectory),
        notifier: None,
    };
    build_app_router(state, &config)
}

fn build_app_with(
    pool: PgPool,
    catalog: Arc<dyn VariantCatalog>,
    notifier: Option<Arc<dyn Notifier>>,
) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        catalog,
        directory: Arc::new(StubDirectory::with_default_profiles()),
        notifier,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    customer: Option<CustomerId>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(customer) = customer {
        builder = builder
            .header("x-shop-domain", SHOP)
            .header("x-customer-id", customer.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, customer: CustomerId) -> Response<Body> {
    send(app, "GET", uri, Some(customer), None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    customer: CustomerId,
    json: serde_json::Value,
) -> Response<Body> {
    send(app, "POST", uri, Some(customer), Some(json)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    customer: CustomerId,
    json: serde_json::Value,
) -> Response<Body> {
    send(app, "PUT", uri, Some(customer), Some(json)).await
}

pub async fn delete(app: Router, uri: &str, customer: CustomerId) -> Response<Body> {
    send(app, "DELETE", uri, Some(customer), None).await
}

/// PUT with the merchant admin token instead of storefront identity.
pub async fn put_json_admin(
    app: Router,
    uri: &str,
    token: &str,
    json: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("x-admin-token", token)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Request without identity headers, for 401 surface checks.
pub async fn post_json_anonymous(
    app: Router,
    uri: &str,
    json: serde_json::Value,
) -> Response<Body> {
    send(app, "POST", uri, None, Some(json)).await
}

pub async fn get_anonymous(app: Router, uri: &str) -> Response<Body> {
    send(app, "GET", uri, None, None).await
}

/// Parse a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

/// Assert an error response carries the expected status and `code`.
pub async fn assert_error(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected error body: {json}");
}

use std::sync::Arc;

use crate::clients::catalog::VariantCatalog;
use crate::clients::directory::MemberDirectory;
use crate::config::ServerConfig;
use crate::notifications::Notifier;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: orderdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Variant catalog lookup (storefront platform API).
    pub catalog: Arc<dyn VariantCatalog>,
    /// Customer directory lookup (storefront platform API).
    pub directory: Arc<dyn MemberDirectory>,
    /// Outbound notification channel; `None` when SMTP is not configured.
    pub notifier: Option<Arc<dyn Notifier>>,
}

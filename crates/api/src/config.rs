use crate::notifications::email::EmailConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public base URL of the storefront app, used for deep links in
    /// notification emails and share redemption paths.
    pub app_base_url: String,
    /// Base URL of the storefront platform API (catalog and customer
    /// lookups).
    pub storefront_api_base: String,
    /// Access token for the storefront platform API.
    pub storefront_api_token: String,
    /// Shared secret for merchant-only endpoints (`x-admin-token`
    /// header). `None` disables those endpoints.
    pub admin_api_token: Option<String>,
    /// SMTP configuration; `None` means notifications are not configured
    /// and submit-for-approval will refuse to run.
    pub email: Option<EmailConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `APP_BASE_URL`          | `http://localhost:3000`    |
    /// | `STOREFRONT_API_BASE`   | `http://localhost:4000`    |
    /// | `STOREFRONT_API_TOKEN`  | (empty)                    |
    /// | `ADMIN_API_TOKEN`       | (unset)                    |
    ///
    /// Email settings come from `EmailConfig::from_env` (`SMTP_*` vars).
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let app_base_url = std::env::var("APP_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());

        let storefront_api_base = std::env::var("STOREFRONT_API_BASE")
            .unwrap_or_else(|_| "http://localhost:4000".into());

        let storefront_api_token = std::env::var("STOREFRONT_API_TOKEN").unwrap_or_default();

        let admin_api_token = std::env::var("ADMIN_API_TOKEN").ok().filter(|t| !t.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            app_base_url,
            storefront_api_base,
            storefront_api_token,
            admin_api_token,
            email: EmailConfig::from_env(),
        }
    }
}

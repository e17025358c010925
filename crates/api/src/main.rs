use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orderdesk_api::clients::catalog::HttpVariantCatalog;
use orderdesk_api::clients::directory::HttpMemberDirectory;
use orderdesk_api::config::ServerConfig;
use orderdesk_api::notifications::email::SmtpNotifier;
use orderdesk_api::notifications::Notifier;
use orderdesk_api::router::build_app_router;
use orderdesk_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orderdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = orderdesk_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    orderdesk_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    orderdesk_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Storefront platform clients ---
    let catalog = Arc::new(HttpVariantCatalog::new(
        &config.storefront_api_base,
        &config.storefront_api_token,
    ));
    let directory = Arc::new(HttpMemberDirectory::new(
        &config.storefront_api_base,
        &config.storefront_api_token,
    ));

    // --- Notifications ---
    let notifier: Option<Arc<dyn Notifier>> = match config.email.clone() {
        Some(email_config) => {
            tracing::info!(host = %email_config.smtp_host, "SMTP notifications enabled");
            Some(Arc::new(SmtpNotifier::new(email_config)))
        }
        None => {
            tracing::warn!("SMTP_HOST not set; approval submission will be refused");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        catalog,
        directory,
        notifier,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Serve ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT combination");
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .await
        .expect("Server exited with error");
}

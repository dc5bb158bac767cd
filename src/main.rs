//! Raven server binary.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use raven::adapters::events::EventBus;
use raven::adapters::http::{router, AppState, HttpSettings, RouterSettings};
use raven::adapters::postgres::{PostgresMailRepository, PostgresSessionStore};
use raven::adapters::storage::{LocalBlobStorage, LocalDocumentStorage};
use raven::application::Notifier;
use raven::config::AppConfig;
use raven::domain::foundation::UserId;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config);

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let bus = Arc::new(EventBus::new(config.hub.subscriber_capacity));
    let store = Arc::new(PostgresSessionStore::new(pool.clone()));

    let state = AppState {
        mail_repository: Arc::new(PostgresMailRepository::new(pool)),
        session_store: store,
        blobs: Arc::new(LocalBlobStorage::new(&config.storage.uploads_dir)),
        documents: Arc::new(LocalDocumentStorage::new(&config.storage.documents_dir)),
        subscriber: bus.clone(),
        notifier: Notifier::new(bus),
        http_client: reqwest::Client::builder()
            .timeout(Duration::from_secs(config.server.request_timeout_secs))
            .build()?,
        settings: Arc::new(HttpSettings {
            default_user_id: UserId::new(config.server.default_user_id.clone())?,
            keep_alive: config.hub.keep_alive(),
            template_path: config.storage.template_path.clone(),
            document_command_url: config.document_server.command_url(),
        }),
    };

    let app = router(
        state,
        &RouterSettings {
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
            cors_origins: config.server.cors_origins_list(),
        },
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Raven listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

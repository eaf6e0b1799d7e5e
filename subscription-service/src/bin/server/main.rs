use std::sync::Arc;

use auth::Authenticator;
use auth::TokenLifetimes;
use sqlx::postgres::PgPoolOptions;
use subscription_service::config::Config;
use subscription_service::domain::catalog::service::CatalogService;
use subscription_service::domain::subscription::service::SubscriptionService;
use subscription_service::inbound::http::router::create_router;
use subscription_service::outbound::repositories::PostgresCatalogRepository;
use subscription_service::outbound::repositories::PostgresSubscriptionRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "subscription_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "subscription-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    // Only verifies tokens; lifetimes are set by the issuing user service.
    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        TokenLifetimes::default(),
    ));
    let subscription_repository = Arc::new(PostgresSubscriptionRepository::new(pg_pool.clone()));
    let subscription_service = Arc::new(SubscriptionService::new(subscription_repository));
    let catalog_repository = Arc::new(PostgresCatalogRepository::new(pg_pool));
    let catalog_service = Arc::new(CatalogService::new(catalog_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(subscription_service, catalog_service, authenticator);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}

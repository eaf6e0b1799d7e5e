use std::sync::Arc;

use auth::Authenticator;
use auth::TokenLifetimes;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use user_service::config::Config;
use user_service::domain::user::service::AuthService;
use user_service::inbound::http::router::create_router;
use user_service::outbound::notifier::LogNotifier;
use user_service::outbound::oauth::SpotifyFederator;
use user_service::outbound::repositories::PostgresOneTimeTokenRepository;
use user_service::outbound::repositories::PostgresUserRepository;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "user-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        session_ttl_hours = config.jwt.session_ttl_hours,
        passwordless_ttl_minutes = config.jwt.passwordless_ttl_minutes,
        spotify_redirect_url = %config.spotify.redirect_url,
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

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        TokenLifetimes {
            session: chrono::Duration::hours(config.jwt.session_ttl_hours),
            passwordless: chrono::Duration::minutes(config.jwt.passwordless_ttl_minutes),
        },
    ));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let one_time_token_repository = Arc::new(PostgresOneTimeTokenRepository::new(pg_pool));
    let notifier = Arc::new(LogNotifier::new());
    let federator = Arc::new(SpotifyFederator::new(&config.spotify)?);

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        one_time_token_repository,
        notifier,
        federator,
        Arc::clone(&authenticator),
        config.passwordless.link_base_url.clone(),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        auth_service,
        authenticator,
        config.spotify.frontend_callback_url.clone(),
        config.server.secure_cookies,
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}

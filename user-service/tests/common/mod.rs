use std::sync::Arc;

use auth::Authenticator;
use auth::TokenLifetimes;
use user_service::config::SpotifyConfig;
use user_service::domain::user::models::Notification;
use user_service::domain::user::service::AuthService;
use user_service::inbound::http::router::create_router;
use user_service::outbound::notifier::OutboxNotifier;
use user_service::outbound::oauth::SpotifyFederator;
use user_service::outbound::repositories::InMemoryOneTimeTokenRepository;
use user_service::outbound::repositories::InMemoryUserRepository;
use wiremock::MockServer;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const LINK_BASE_URL: &str = "http://frontend.test/login/verify";
pub const FRONTEND_CALLBACK_URL: &str = "http://frontend.test/auth/callback";
pub const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.test/authorize";

/// Test application that spawns a real server over in-memory stores
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub outbox: Arc<OutboxNotifier>,
    /// Stands in for the Spotify token and profile endpoints
    pub spotify: MockServer,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let spotify = MockServer::start().await;

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let spotify_config = SpotifyConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            redirect_url: format!("{}/api/spotify-callback", address),
            auth_url: SPOTIFY_AUTH_URL.to_string(),
            token_url: format!("{}/api/token", spotify.uri()),
            api_base_url: spotify.uri(),
            scopes: "user-read-email user-read-private".to_string(),
            frontend_callback_url: FRONTEND_CALLBACK_URL.to_string(),
        };

        let authenticator = Arc::new(Authenticator::new(JWT_SECRET, TokenLifetimes::default()));
        let outbox = Arc::new(OutboxNotifier::new());
        let federator = Arc::new(
            SpotifyFederator::new(&spotify_config).expect("Failed to create Spotify client"),
        );

        let auth_service = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryOneTimeTokenRepository::new()),
            Arc::clone(&outbox),
            federator,
            Arc::clone(&authenticator),
            LINK_BASE_URL.to_string(),
        ));

        let router = create_router(
            auth_service,
            Arc::clone(&authenticator),
            FRONTEND_CALLBACK_URL.to_string(),
            false,
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            // Redirects are asserted on, not followed
            api_client: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("Failed to create reqwest client"),
            authenticator,
            outbox,
            spotify,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a password account and return the session token
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/register")
            .json(&serde_json::json!({
                "email": email,
                "display_name": "Test User",
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Messages handed to the notifier so far
    pub async fn sent_notifications(&self) -> Vec<Notification> {
        self.outbox.sent().await
    }

    /// Token carried by the most recent login link
    pub async fn last_login_link_token(&self) -> String {
        let sent = self.sent_notifications().await;
        let body = &sent.last().expect("No notification sent").body;
        body.split("?token=")
            .nth(1)
            .expect("Login link has no token")
            .trim()
            .to_string()
    }
}

use std::sync::Arc;

use auth::Authenticator;
use auth::TokenLifetimes;
use chrono::Utc;
use subscription_service::domain::catalog::models::CatalogStatus;
use subscription_service::domain::catalog::models::Currency;
use subscription_service::domain::catalog::models::PlanName;
use subscription_service::domain::catalog::models::ProviderConfig;
use subscription_service::domain::catalog::models::ProviderName;
use subscription_service::domain::catalog::models::ProviderPlan;
use subscription_service::domain::catalog::service::CatalogService;
use subscription_service::domain::subscription::models::BillingCycleDays;
use subscription_service::domain::subscription::models::Price;
use subscription_service::domain::subscription::service::SubscriptionService;
use subscription_service::inbound::http::router::create_router;
use subscription_service::outbound::repositories::InMemoryCatalogRepository;
use subscription_service::outbound::repositories::InMemorySubscriptionRepository;
use uuid::Uuid;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub authenticator: Authenticator,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let subscription_service = Arc::new(SubscriptionService::new(Arc::new(
            InMemorySubscriptionRepository::new(),
        )));
        let catalog_service = Arc::new(CatalogService::new(Arc::new(
            InMemoryCatalogRepository::new(catalog_fixture()),
        )));
        let router = create_router(
            subscription_service,
            catalog_service,
            Arc::new(Authenticator::new(JWT_SECRET, TokenLifetimes::default())),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            authenticator: Authenticator::new(JWT_SECRET, TokenLifetimes::default()),
        }
    }

    /// Session token for a fresh user, as the user service would issue it
    pub fn session_token(&self) -> String {
        let user_id = Uuid::new_v4().to_string();
        self.authenticator
            .issue_session_token(&user_id, &format!("{}@example.com", user_id))
            .expect("Failed to issue token")
            .token
    }

    /// Login-link token, which must not open the API
    pub fn passwordless_token(&self) -> String {
        self.authenticator
            .issue_passwordless_token(&Uuid::new_v4().to_string(), "someone@example.com")
            .expect("Failed to issue token")
            .token
    }

    /// Helper to make an unauthenticated GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .get(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .post(&format!("{}{}", self.address, path))
            .bearer_auth(token)
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

    /// Create a subscription and return the response `data` object
    pub async fn create_subscription(
        &self,
        token: &str,
        body: serde_json::Value,
    ) -> serde_json::Value {
        let response = self
            .post_authenticated("/api/subscriptions", token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }
}

fn plan(id: i64, name: &str, price: f64, billing_cycle_days: i64, status: CatalogStatus) -> ProviderPlan {
    ProviderPlan {
        id,
        name: PlanName::new(name.to_string()).unwrap(),
        description: String::new(),
        price: Price::new(price).unwrap(),
        currency: Currency::new("EUR").unwrap(),
        billing_cycle_days: BillingCycleDays::new(billing_cycle_days).unwrap(),
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn provider(id: i64, name: &str, status: CatalogStatus, plans: Vec<ProviderPlan>) -> ProviderConfig {
    ProviderConfig {
        id,
        provider: ProviderName::new(name.to_string()).unwrap(),
        description: format!("{} subscription", name),
        logo: format!("https://logo.example.com/{}.png", name.to_lowercase()),
        website: format!("https://www.{}.example.com", name.to_lowercase()),
        status,
        plans,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Spotify and Netflix are on offer (Netflix with one retired plan); Stadia is shut down.
pub fn catalog_fixture() -> Vec<ProviderConfig> {
    vec![
        provider(
            1,
            "Spotify",
            CatalogStatus::Active,
            vec![
                plan(1, "Premium Individual", 10.99, 30, CatalogStatus::Active),
                plan(2, "Premium Family", 17.99, 30, CatalogStatus::Active),
            ],
        ),
        provider(
            2,
            "Stadia",
            CatalogStatus::Inactive,
            vec![plan(3, "Pro", 9.99, 30, CatalogStatus::Active)],
        ),
        provider(
            3,
            "Netflix",
            CatalogStatus::Active,
            vec![
                plan(4, "Standard", 13.49, 30, CatalogStatus::Active),
                plan(5, "Basic", 9.99, 30, CatalogStatus::Deprecated),
            ],
        ),
    ]
}

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::SpotifyConfig;
use crate::domain::user::models::FederatedProfile;
use crate::domain::user::models::ProviderToken;
use crate::domain::user::ports::OAuthFederator;
use crate::user::errors::AuthError;

const PROVIDER: &str = "spotify";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Authorization-code client for Spotify accounts.
///
/// Holds no per-login state; the handshake state is owned by the caller.
#[derive(Debug, Clone)]
pub struct SpotifyFederator {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
    scopes: String,
    auth_url: Url,
    token_url: Url,
    profile_url: Url,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    id: String,
    email: Option<String>,
    display_name: Option<String>,
}

impl SpotifyFederator {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// * Any configured endpoint is not a valid absolute URL
    /// * The HTTP client cannot be constructed
    pub fn new(config: &SpotifyConfig) -> Result<Self, anyhow::Error> {
        let http = Client::builder()
            .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            scopes: config.scopes.clone(),
            auth_url: Url::parse(&config.auth_url)?,
            token_url: Url::parse(&config.token_url)?,
            profile_url: Url::parse(&config.api_base_url)?.join("v1/me")?,
        })
    }
}

fn federation_error(context: &str, e: impl std::fmt::Display) -> AuthError {
    tracing::error!(provider = PROVIDER, error = %e, "{}", context);
    AuthError::FederationFailed(format!("{}: {}", context, e))
}

#[async_trait]
impl OAuthFederator for SpotifyFederator {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn authorization_url(&self, state: &str) -> String {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_url)
            .append_pair("scope", &self.scopes)
            .append_pair("state", state);
        url.into()
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, AuthError> {
        let response = self
            .http
            .post(self.token_url.clone())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_url.as_str()),
            ])
            .send()
            .await
            .map_err(|e| federation_error("Token request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(federation_error(
                "Token endpoint rejected the code",
                status,
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| federation_error("Token response was invalid", e))?;

        Ok(ProviderToken {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<FederatedProfile, AuthError> {
        let response = self
            .http
            .get(self.profile_url.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| federation_error("Profile request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(federation_error("Profile endpoint returned an error", status));
        }

        let profile: ProfileResponse = response
            .json()
            .await
            .map_err(|e| federation_error("Profile response was invalid", e))?;

        let email = profile
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| federation_error("Profile response was invalid", "missing email"))?;

        Ok(FederatedProfile {
            external_id: profile.id,
            email,
            name: profile.display_name.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::body_string_contains;
    use wiremock::matchers::header;
    use wiremock::matchers::header_exists;
    use wiremock::matchers::method;
    use wiremock::matchers::path;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;

    use super::*;

    fn config(server_uri: &str) -> SpotifyConfig {
        SpotifyConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_url: "http://localhost:8080/api/spotify-callback".to_string(),
            auth_url: "https://accounts.spotify.com/authorize".to_string(),
            token_url: format!("{}/api/token", server_uri),
            api_base_url: server_uri.to_string(),
            scopes: "user-read-email user-read-private".to_string(),
            frontend_callback_url: "http://localhost:3000/login/callback/spotify".to_string(),
        }
    }

    #[test]
    fn test_authorization_url_carries_state() {
        let federator = SpotifyFederator::new(&config("http://127.0.0.1:1")).unwrap();

        let url = Url::parse(&federator.authorization_url("abc-123")).unwrap();
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(pairs["state"], "abc-123");
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["client_id"], "client-id");
        assert_eq!(pairs["scope"], "user-read-email user-read-private");
    }

    #[tokio::test]
    async fn test_exchange_code_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(header_exists("authorization"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=the-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "access-1",
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "refresh-1",
                "scope": "user-read-email user-read-private"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let federator = SpotifyFederator::new(&config(&server.uri())).unwrap();
        let token = federator.exchange_code("the-code").await.unwrap();

        assert_eq!(token.access_token, "access-1");
        assert_eq!(token.refresh_token.as_deref(), Some("refresh-1"));
        assert!(token.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_exchange_code_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let federator = SpotifyFederator::new(&config(&server.uri())).unwrap();
        let result = federator.exchange_code("stale").await;

        assert!(matches!(result, Err(AuthError::FederationFailed(_))));
    }

    #[tokio::test]
    async fn test_fetch_profile_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .and(header("authorization", "Bearer access-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "spotify-user-1",
                "email": "alice@example.com",
                "display_name": "Alice S"
            })))
            .mount(&server)
            .await;

        let federator = SpotifyFederator::new(&config(&server.uri())).unwrap();
        let profile = federator.fetch_profile("access-1").await.unwrap();

        assert_eq!(profile.external_id, "spotify-user-1");
        assert_eq!(profile.email, "alice@example.com");
        assert_eq!(profile.name, "Alice S");
    }

    #[tokio::test]
    async fn test_fetch_profile_without_email() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "spotify-user-1",
                "display_name": "Alice S"
            })))
            .mount(&server)
            .await;

        let federator = SpotifyFederator::new(&config(&server.uri())).unwrap();
        let result = federator.fetch_profile("access-1").await;

        assert!(matches!(result, Err(AuthError::FederationFailed(_))));
    }

    #[tokio::test]
    async fn test_fetch_profile_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let federator = SpotifyFederator::new(&config(&server.uri())).unwrap();
        let result = federator.fetch_profile("expired").await;

        assert!(matches!(result, Err(AuthError::FederationFailed(_))));
    }
}

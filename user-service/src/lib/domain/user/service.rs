use std::sync::Arc;

use async_trait::async_trait;
use auth::state::constant_time_eq;
use auth::state::generate_state;
use auth::Authenticator;
use auth::IssuedToken;
use auth::TokenPurpose;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::AuthorizationRedirect;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::FederatedCredentials;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Notification;
use crate::domain::user::models::OneTimeToken;
use crate::domain::user::models::OneTimeTokenPurpose;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::Notifier;
use crate::user::ports::OAuthFederator;
use crate::user::ports::OneTimeTokenRepository;
use crate::user::ports::UserRepository;

const PASSWORDLESS_SUBJECT: &str = "Passwordless Login";
const OAUTH_STATE_TTL_MINUTES: i64 = 10;

/// Domain service implementing every credential path.
///
/// All paths end in a session token issued by the shared [`Authenticator`].
pub struct AuthService<UR, TR, N, F>
where
    UR: UserRepository,
    TR: OneTimeTokenRepository,
    N: Notifier,
    F: OAuthFederator,
{
    users: Arc<UR>,
    one_time_tokens: Arc<TR>,
    notifier: Arc<N>,
    federator: Arc<F>,
    authenticator: Arc<Authenticator>,
    link_base_url: String,
}

impl<UR, TR, N, F> AuthService<UR, TR, N, F>
where
    UR: UserRepository,
    TR: OneTimeTokenRepository,
    N: Notifier,
    F: OAuthFederator,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `one_time_tokens` - Single-use token persistence implementation
    /// * `notifier` - Delivery channel for login links
    /// * `federator` - External identity provider client
    /// * `authenticator` - Password and token primitives
    /// * `link_base_url` - Frontend URL the passwordless token is appended to
    pub fn new(
        users: Arc<UR>,
        one_time_tokens: Arc<TR>,
        notifier: Arc<N>,
        federator: Arc<F>,
        authenticator: Arc<Authenticator>,
        link_base_url: String,
    ) -> Self {
        Self {
            users,
            one_time_tokens,
            notifier,
            federator,
            authenticator,
            link_base_url,
        }
    }

    fn start_session(&self, user: User) -> Result<AuthSession, AuthError> {
        let issued = self
            .authenticator
            .issue_session_token(&user.id.to_string(), user.email.as_str())
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;

        Self::session_from(issued, user)
    }

    fn session_from(issued: IssuedToken, user: User) -> Result<AuthSession, AuthError> {
        Ok(AuthSession {
            expires_at: expiry(issued.claims.exp)?,
            token: issued.token,
            user,
        })
    }

    fn hash(&self, password: &str) -> Result<String, AuthError> {
        self.authenticator
            .hash_password(password)
            .map_err(|e| AuthError::PasswordHashing(e.to_string()))
    }

    async fn verify_state(&self, state: &str, saved_state: Option<&str>) -> Result<(), AuthError> {
        // Both values are burned before any comparison, whatever the outcome.
        let known = if state.is_empty() {
            false
        } else {
            self.one_time_tokens
                .consume(state, OneTimeTokenPurpose::OAuthState)
                .await?
        };

        let saved_state = saved_state.filter(|s| !s.is_empty());
        if let Some(saved) = saved_state.filter(|saved| *saved != state) {
            self.one_time_tokens
                .consume(saved, OneTimeTokenPurpose::OAuthState)
                .await?;
        }

        let saved_state = saved_state.ok_or_else(|| {
            tracing::warn!("OAuth callback without saved state");
            AuthError::FederationFailed("missing saved state".to_string())
        })?;

        if !constant_time_eq(state, saved_state) {
            tracing::warn!("OAuth state mismatch on callback");
            return Err(AuthError::FederationFailed("state mismatch".to_string()));
        }
        if !known {
            tracing::warn!("OAuth callback with unknown or expired state");
            return Err(AuthError::FederationFailed(
                "unknown or expired state".to_string(),
            ));
        }

        Ok(())
    }
}

fn expiry(timestamp: i64) -> Result<DateTime<Utc>, AuthError> {
    DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| AuthError::TokenIssuance(format!("expiry out of range: {}", timestamp)))
}

#[async_trait]
impl<UR, TR, N, F> AuthServicePort for AuthService<UR, TR, N, F>
where
    UR: UserRepository,
    TR: OneTimeTokenRepository,
    N: Notifier,
    F: OAuthFederator,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AuthError> {
        if self.users.find_by_email(&command.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists(command.email.to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: command.email,
            display_name: command.display_name,
            password_hash: Some(self.hash(command.password.expose())?),
            federated_credentials: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.users.create(user).await?;
        tracing::info!(user_id = %created.id, "User registered");

        self.start_session(created)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AuthError> {
        let user = match self.users.find_by_email(&command.email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login attempt for unknown email");
                // Same Argon2 cost as a known account.
                let _ = self.authenticator.verify_password(&command.password, None);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let issued = self
            .authenticator
            .authenticate(
                &command.password,
                user.password_hash.as_deref(),
                &user.id.to_string(),
                user.email.as_str(),
            )
            .map_err(|e| {
                tracing::warn!(user_id = %user.id, "Password login rejected");
                AuthError::from(e)
            })?;

        Self::session_from(issued, user)
    }

    async fn initiate_passwordless_login(&self, email: &EmailAddress) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(email.to_string()))?;

        let issued = self
            .authenticator
            .issue_passwordless_token(&user.id.to_string(), user.email.as_str())
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;

        self.one_time_tokens
            .store(OneTimeToken {
                id: issued.claims.jti.clone(),
                purpose: OneTimeTokenPurpose::PasswordlessLogin,
                expires_at: expiry(issued.claims.exp)?,
            })
            .await?;

        let link = format!("{}?token={}", self.link_base_url, issued.token);
        self.notifier
            .send(Notification {
                to: user.email.clone(),
                subject: PASSWORDLESS_SUBJECT.to_string(),
                body: format!("Click the link to login: {}", link),
            })
            .await?;

        tracing::info!(user_id = %user.id, "Passwordless login link sent");
        Ok(())
    }

    async fn verify_login_token(&self, token: &str) -> Result<AuthSession, AuthError> {
        let claims = self
            .authenticator
            .validate_token(token, TokenPurpose::Passwordless)
            .map_err(|e| {
                tracing::warn!(error = %e, "Passwordless token rejected");
                AuthError::InvalidToken(e.to_string())
            })?;

        let consumed = self
            .one_time_tokens
            .consume(&claims.jti, OneTimeTokenPurpose::PasswordlessLogin)
            .await?;
        if !consumed {
            tracing::warn!("Passwordless token replayed");
            return Err(AuthError::InvalidToken("login link already used".to_string()));
        }

        let user_id =
            UserId::from_string(&claims.sub).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))?;

        self.start_session(user)
    }

    async fn begin_spotify_login(&self) -> Result<AuthorizationRedirect, AuthError> {
        let state = generate_state();

        self.one_time_tokens
            .store(OneTimeToken {
                id: state.clone(),
                purpose: OneTimeTokenPurpose::OAuthState,
                expires_at: Utc::now() + Duration::minutes(OAUTH_STATE_TTL_MINUTES),
            })
            .await?;

        let url = self.spotify_auth_url(&state);
        Ok(AuthorizationRedirect { state, url })
    }

    fn spotify_auth_url(&self, state: &str) -> String {
        self.federator.authorization_url(state)
    }

    async fn handle_spotify_callback(
        &self,
        code: &str,
        state: &str,
        saved_state: Option<&str>,
    ) -> Result<AuthSession, AuthError> {
        self.verify_state(state, saved_state).await?;

        if code.is_empty() {
            return Err(AuthError::FederationFailed(
                "missing authorization code".to_string(),
            ));
        }

        let provider_token = self.federator.exchange_code(code).await?;
        let profile = self
            .federator
            .fetch_profile(&provider_token.access_token)
            .await?;

        let email = EmailAddress::new(profile.email)
            .map_err(|e| AuthError::FederationFailed(format!("provider email: {}", e)))?;
        let credentials = FederatedCredentials {
            provider: self.federator.provider().to_string(),
            subject: profile.external_id,
            access_token: provider_token.access_token,
            refresh_token: provider_token.refresh_token,
            expires_at: provider_token.expires_at,
        };

        let now = Utc::now();
        let user = match self.users.find_by_email(&email).await? {
            Some(mut existing) => {
                existing.federated_credentials = Some(credentials);
                existing.updated_at = now;
                self.users.update(existing).await?
            }
            None => {
                let display_name = DisplayName::new(profile.name)
                    .map_err(|e| AuthError::FederationFailed(format!("provider name: {}", e)))?;
                let created = self
                    .users
                    .create(User {
                        id: UserId::new(),
                        email,
                        display_name,
                        password_hash: None,
                        federated_credentials: Some(credentials),
                        created_at: now,
                        updated_at: now,
                    })
                    .await?;
                tracing::info!(user_id = %created.id, "User created from federated login");
                created
            }
        };

        self.start_session(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, AuthError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(id.to_string()))
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, AuthError> {
        let mut user = self.get_user(id).await?;

        if let Some(display_name) = command.display_name {
            user.display_name = display_name;
        }

        if let Some(password) = command.password {
            user.password_hash = Some(self.hash(password.expose())?);
        }

        user.updated_at = Utc::now();
        self.users.update(user).await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), AuthError> {
        self.users.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}

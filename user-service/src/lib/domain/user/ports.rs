use async_trait::async_trait;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::AuthorizationRedirect;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::FederatedProfile;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Notification;
use crate::domain::user::models::OneTimeToken;
use crate::domain::user::models::OneTimeTokenPurpose;
use crate::domain::user::models::ProviderToken;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;

/// Port for authentication and account operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create a password account and log it in.
    ///
    /// # Arguments
    /// * `command` - Validated email, display name and password
    ///
    /// # Returns
    /// Session token and the created user
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `StoreUnavailable` - User store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AuthError>;

    /// Log in with email and password.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, wrong password, or no password on the account
    /// * `StoreUnavailable` - User store operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AuthError>;

    /// Email a single-use login link to a registered user.
    ///
    /// The link token is never returned to the caller.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `NotificationFailed` - The link could not be delivered
    async fn initiate_passwordless_login(&self, email: &EmailAddress) -> Result<(), AuthError>;

    /// Exchange a passwordless link token for a session token.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, wrong purpose, expired, or already used
    /// * `UserNotFound` - The token subject no longer exists
    async fn verify_login_token(&self, token: &str) -> Result<AuthSession, AuthError>;

    /// Generate and record a handshake state and build the provider redirect for it.
    ///
    /// # Errors
    /// * `StoreUnavailable` - The state could not be recorded
    async fn begin_spotify_login(&self) -> Result<AuthorizationRedirect, AuthError>;

    /// Build the provider authorization URL for an existing state.
    fn spotify_auth_url(&self, state: &str) -> String;

    /// Complete a federated login from the provider callback.
    ///
    /// # Arguments
    /// * `code` - Authorization code echoed by the provider
    /// * `state` - State echoed by the provider
    /// * `saved_state` - State round-tripped through the client cookie
    ///
    /// # Errors
    /// * `FederationFailed` - State mismatch, unknown state, exchange or profile failure
    async fn handle_spotify_callback(
        &self,
        code: &str,
        state: &str,
        saved_state: Option<&str>,
    ) -> Result<AuthSession, AuthError>;

    /// # Errors
    /// * `UserNotFound` - User does not exist
    async fn get_user(&self, id: &UserId) -> Result<User, AuthError>;

    /// # Errors
    /// * `UserNotFound` - User does not exist
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, AuthError>;

    /// # Errors
    /// * `UserNotFound` - User does not exist
    async fn delete_user(&self, id: &UserId) -> Result<(), AuthError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `StoreUnavailable` - Database operation failed
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError>;

    /// Replace the stored user with the given entity.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `StoreUnavailable` - Database operation failed
    async fn update(&self, user: User) -> Result<User, AuthError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `StoreUnavailable` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), AuthError>;
}

/// Storage for single-use tokens (passwordless link ids, OAuth states).
#[async_trait]
pub trait OneTimeTokenRepository: Send + Sync + 'static {
    /// Record a token so it can be consumed once before it expires.
    async fn store(&self, token: OneTimeToken) -> Result<(), AuthError>;

    /// Atomically remove an unexpired token.
    ///
    /// # Returns
    /// True if the token existed, had this purpose and had not expired
    async fn consume(&self, id: &str, purpose: OneTimeTokenPurpose) -> Result<bool, AuthError>;
}

/// Outbound delivery of user notifications.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// # Errors
    /// * `NotificationFailed` - Delivery failed
    async fn send(&self, notification: Notification) -> Result<(), AuthError>;
}

/// Authorization-code flow against an external identity provider.
#[async_trait]
pub trait OAuthFederator: Send + Sync + 'static {
    /// Provider name stored with federated credentials.
    fn provider(&self) -> &'static str;

    /// Build the provider authorization URL carrying `state`.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code for a provider token. Never retried.
    ///
    /// # Errors
    /// * `FederationFailed` - Transport failure or non-success response
    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, AuthError>;

    /// Fetch the identity behind a provider access token.
    ///
    /// # Errors
    /// * `FederationFailed` - Transport failure, non-success response, or missing email
    async fn fetch_profile(&self, access_token: &str) -> Result<FederatedProfile, AuthError>;
}

use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenPurpose;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// How long each kind of token stays valid.
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub session: Duration,
    pub passwordless: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            session: Duration::hours(24),
            passwordless: Duration::minutes(15),
        }
    }
}

/// Well-formed digest of no real password, checked when an account has none so
/// that rejecting an unknown or federation-only account costs one full Argon2 run.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$OvJyBncI00Xdzqg5nI6xrg$dHs/PLBVvRfl2aBuYky3ncetUR8nQFzJUCfQTVKofCk";

/// A signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

/// Authentication coordinator combining password verification and token issuance.
///
/// Every credential path ends in [`Authenticator::issue_session_token`], so the
/// session tokens handed out are indistinguishable whichever scheme was used.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    lifetimes: TokenLifetimes,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `lifetimes` - Session and passwordless token lifetimes
    pub fn new(jwt_secret: &[u8], lifetimes: TokenLifetimes) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            lifetimes,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against an optional stored digest.
    ///
    /// A missing digest (federation-only account), a malformed digest and a
    /// mismatch are all reported as `InvalidCredentials`.
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: Option<&str>,
    ) -> Result<(), AuthenticationError> {
        let Some(stored_hash) = stored_hash else {
            let _ = self.password_hasher.verify(password, DUMMY_HASH);
            return Err(AuthenticationError::InvalidCredentials);
        };

        match self.password_hasher.verify(password, stored_hash) {
            Ok(true) => Ok(()),
            Ok(false) | Err(PasswordError::MalformedHash(_)) => {
                Err(AuthenticationError::InvalidCredentials)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored digest, if the account has one
    /// * `subject` - User identifier placed in `sub`
    /// * `email` - User email placed in `email`
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match or no usable digest
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: Option<&str>,
        subject: &str,
        email: &str,
    ) -> Result<IssuedToken, AuthenticationError> {
        self.verify_password(password, stored_hash)?;

        Ok(self.issue_session_token(subject, email)?)
    }

    /// Issue a session token for an already verified identity.
    pub fn issue_session_token(&self, subject: &str, email: &str) -> Result<IssuedToken, JwtError> {
        self.issue(Claims::session(subject, email, self.lifetimes.session))
    }

    /// Issue a short-lived passwordless link token.
    pub fn issue_passwordless_token(
        &self,
        subject: &str,
        email: &str,
    ) -> Result<IssuedToken, JwtError> {
        self.issue(Claims::passwordless(
            subject,
            email,
            self.lifetimes.passwordless,
        ))
    }

    /// Validate a token and check it was issued for `expected`.
    ///
    /// # Errors
    /// * `PurposeMismatch` - Token is valid but for another purpose
    /// * `JwtError` - Signature, expiry or format check failed
    pub fn validate_token(&self, token: &str, expected: TokenPurpose) -> Result<Claims, JwtError> {
        let claims = self.jwt_handler.decode(token)?;

        if claims.purpose != expected {
            return Err(JwtError::PurposeMismatch {
                expected,
                actual: claims.purpose,
            });
        }

        Ok(claims)
    }

    fn issue(&self, claims: Claims) -> Result<IssuedToken, JwtError> {
        let token = self.jwt_handler.encode(&claims)?;
        Ok(IssuedToken { token, claims })
    }
}

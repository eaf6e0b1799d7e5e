use std::fmt;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// What a token may be used for.
///
/// Checked on every verification: a passwordless link token can only be
/// exchanged for a session token, never presented as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Session,
    Passwordless,
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPurpose::Session => write!(f, "session"),
            TokenPurpose::Passwordless => write!(f, "passwordless"),
        }
    }
}

/// Claim set carried by every token the services issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Email address of the subject at issuance time
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    pub purpose: TokenPurpose,

    /// Unique token identifier
    pub jti: String,
}

impl Claims {
    /// Create claims expiring `lifetime` from now with a fresh token id.
    ///
    /// # Arguments
    /// * `subject` - User identifier
    /// * `email` - User email address
    /// * `purpose` - Intended use of the token
    /// * `lifetime` - Time until the token expires
    pub fn new(
        subject: impl ToString,
        email: impl ToString,
        purpose: TokenPurpose,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            purpose,
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn session(subject: impl ToString, email: impl ToString, lifetime: Duration) -> Self {
        Self::new(subject, email, TokenPurpose::Session, lifetime)
    }

    pub fn passwordless(subject: impl ToString, email: impl ToString, lifetime: Duration) -> Self {
        Self::new(subject, email, TokenPurpose::Passwordless, lifetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_claims_lifetime() {
        let claims = Claims::session("user123", "alice@example.com", Duration::hours(24));

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.purpose, TokenPurpose::Session);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_passwordless_claims_lifetime() {
        let claims = Claims::passwordless("user123", "alice@example.com", Duration::minutes(15));

        assert_eq!(claims.purpose, TokenPurpose::Passwordless);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_each_claim_set_gets_its_own_jti() {
        let first = Claims::passwordless("user123", "alice@example.com", Duration::minutes(15));
        let second = Claims::passwordless("user123", "alice@example.com", Duration::minutes(15));

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_purpose_serializes_snake_case() {
        let claims = Claims::passwordless("user123", "alice@example.com", Duration::minutes(15));
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["purpose"], "passwordless");
    }
}

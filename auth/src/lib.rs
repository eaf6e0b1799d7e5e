//! Credential and token primitives shared by the services.
//!
//! Provides:
//! - Password hashing (Argon2id)
//! - Signed bearer tokens with a typed claim set and a purpose tag
//! - OAuth handshake state generation and comparison
//!
//! Services keep their own domain ports and wrap these implementations behind them.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Session and passwordless tokens
//! ```
//! use auth::{Authenticator, TokenLifetimes, TokenPurpose};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", TokenLifetimes::default());
//!
//! let hash = auth.hash_password("password123").unwrap();
//! let issued = auth
//!     .authenticate("password123", Some(&hash), "user-1", "alice@example.com")
//!     .unwrap();
//!
//! let claims = auth.validate_token(&issued.token, TokenPurpose::Session).unwrap();
//! assert_eq!(claims.sub, "user-1");
//!
//! // A passwordless link token is never accepted as a session token.
//! let link = auth.issue_passwordless_token("user-1", "alice@example.com").unwrap();
//! assert!(auth.validate_token(&link.token, TokenPurpose::Session).is_err());
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod state;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::IssuedToken;
pub use authenticator::TokenLifetimes;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenPurpose;
pub use password::PasswordError;
pub use password::PasswordHasher;

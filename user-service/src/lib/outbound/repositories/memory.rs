//! Process-local stores for development runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::OneTimeToken;
use crate::domain::user::models::OneTimeTokenPurpose;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::OneTimeTokenRepository;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::AuthError;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailAlreadyExists(user.email.to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(AuthError::EmailAlreadyExists(user.email.to_string()));
        }

        match users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user)
            }
            None => Err(AuthError::UserNotFound(user.id.to_string())),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), AuthError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AuthError::UserNotFound(id.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryOneTimeTokenRepository {
    tokens: RwLock<HashMap<(String, OneTimeTokenPurpose), DateTime<Utc>>>,
}

impl InMemoryOneTimeTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OneTimeTokenRepository for InMemoryOneTimeTokenRepository {
    async fn store(&self, token: OneTimeToken) -> Result<(), AuthError> {
        let now = Utc::now();
        let mut tokens = self.tokens.write().await;
        tokens.retain(|_, expires_at| *expires_at > now);
        tokens.insert((token.id, token.purpose), token.expires_at);
        Ok(())
    }

    async fn consume(&self, id: &str, purpose: OneTimeTokenPurpose) -> Result<bool, AuthError> {
        let removed = self
            .tokens
            .write()
            .await
            .remove(&(id.to_string(), purpose));

        Ok(removed.is_some_and(|expires_at| expires_at > Utc::now()))
    }
}

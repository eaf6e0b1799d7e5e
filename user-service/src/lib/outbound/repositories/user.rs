use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::FederatedCredentials;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::AuthError;

const USER_COLUMNS: &str = r#"
    id, email, display_name, password_hash,
    oauth_provider, oauth_subject, oauth_access_token, oauth_refresh_token, oauth_expires_at,
    created_at, updated_at
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: PgRow) -> Result<User, AuthError> {
        let provider: Option<String> = row.try_get("oauth_provider").map_err(store_error)?;
        let subject: Option<String> = row.try_get("oauth_subject").map_err(store_error)?;
        let access_token: Option<String> =
            row.try_get("oauth_access_token").map_err(store_error)?;
        let expires_at: Option<DateTime<Utc>> =
            row.try_get("oauth_expires_at").map_err(store_error)?;

        // Federated columns are written together; a partial set is treated as absent.
        let federated_credentials = match (provider, subject, access_token, expires_at) {
            (Some(provider), Some(subject), Some(access_token), Some(expires_at)) => {
                Some(FederatedCredentials {
                    provider,
                    subject,
                    access_token,
                    refresh_token: row.try_get("oauth_refresh_token").map_err(store_error)?,
                    expires_at,
                })
            }
            _ => None,
        };

        Ok(User {
            id: UserId(row.try_get("id").map_err(store_error)?),
            email: EmailAddress::new(row.try_get("email").map_err(store_error)?)?,
            display_name: DisplayName::new(row.try_get("display_name").map_err(store_error)?)?,
            password_hash: row.try_get("password_hash").map_err(store_error)?,
            federated_credentials,
            created_at: row.try_get("created_at").map_err(store_error)?,
            updated_at: row.try_get("updated_at").map_err(store_error)?,
        })
    }

    fn map_write_error(e: sqlx::Error, user: &User) -> AuthError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                return AuthError::EmailAlreadyExists(user.email.to_string());
            }
        }
        store_error(e)
    }
}

fn store_error(e: sqlx::Error) -> AuthError {
    tracing::error!(error = %e, "User store operation failed");
    AuthError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        let credentials = user.federated_credentials.as_ref();

        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, display_name, password_hash,
                oauth_provider, oauth_subject, oauth_access_token, oauth_refresh_token, oauth_expires_at,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(user.display_name.as_str())
        .bind(user.password_hash.as_deref())
        .bind(credentials.map(|c| c.provider.as_str()))
        .bind(credentials.map(|c| c.subject.as_str()))
        .bind(credentials.map(|c| c.access_token.as_str()))
        .bind(credentials.and_then(|c| c.refresh_token.as_deref()))
        .bind(credentials.map(|c| c.expires_at))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &user))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?
            .map(Self::row_to_user)
            .transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        sqlx::query(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?
            .map(Self::row_to_user)
            .transpose()
    }

    async fn update(&self, user: User) -> Result<User, AuthError> {
        let credentials = user.federated_credentials.as_ref();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2,
                display_name = $3,
                password_hash = $4,
                oauth_provider = $5,
                oauth_subject = $6,
                oauth_access_token = $7,
                oauth_refresh_token = $8,
                oauth_expires_at = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(user.display_name.as_str())
        .bind(user.password_hash.as_deref())
        .bind(credentials.map(|c| c.provider.as_str()))
        .bind(credentials.map(|c| c.subject.as_str()))
        .bind(credentials.map(|c| c.access_token.as_str()))
        .bind(credentials.and_then(|c| c.refresh_token.as_deref()))
        .bind(credentials.map(|c| c.expires_at))
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &user))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound(user.id.to_string()));
        }

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), AuthError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound(id.to_string()));
        }

        Ok(())
    }
}

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::user::models::OneTimeToken;
use crate::domain::user::models::OneTimeTokenPurpose;
use crate::domain::user::ports::OneTimeTokenRepository;
use crate::user::errors::AuthError;

pub struct PostgresOneTimeTokenRepository {
    pool: PgPool,
}

impl PostgresOneTimeTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn store_error(e: sqlx::Error) -> AuthError {
    tracing::error!(error = %e, "One-time token store operation failed");
    AuthError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl OneTimeTokenRepository for PostgresOneTimeTokenRepository {
    async fn store(&self, token: OneTimeToken) -> Result<(), AuthError> {
        // Expired records are swept on every write.
        sqlx::query("DELETE FROM one_time_tokens WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        sqlx::query(
            r#"
            INSERT INTO one_time_tokens (token_id, purpose, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&token.id)
        .bind(token.purpose.as_str())
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn consume(&self, id: &str, purpose: OneTimeTokenPurpose) -> Result<bool, AuthError> {
        // A single DELETE keeps concurrent consumers from both succeeding.
        let result = sqlx::query(
            r#"
            DELETE FROM one_time_tokens
            WHERE token_id = $1 AND purpose = $2 AND expires_at > NOW()
            "#,
        )
        .bind(id)
        .bind(purpose.as_str())
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(result.rows_affected() == 1)
    }
}

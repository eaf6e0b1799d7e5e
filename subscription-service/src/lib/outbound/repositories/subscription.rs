use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use sqlx::Row;

use crate::domain::subscription::errors::SubscriptionError;
use crate::domain::subscription::models::BillingCycleDays;
use crate::domain::subscription::models::NewSubscription;
use crate::domain::subscription::models::OwnerId;
use crate::domain::subscription::models::Price;
use crate::domain::subscription::models::RowId;
use crate::domain::subscription::models::Subscription;
use crate::domain::subscription::models::SubscriptionFilter;
use crate::domain::subscription::models::SubscriptionId;
use crate::domain::subscription::models::SubscriptionName;
use crate::domain::subscription::ports::SubscriptionRepository;

const SUBSCRIPTION_COLUMNS: &str = r#"
    row_id, subscription_id, owner_id, name, price, billing_cycle_days,
    start_date, logo_reference, active, created_at
"#;

/// Append-only subscription table. Rows are inserted and deleted, never updated.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_subscription(row: PgRow) -> Result<Subscription, SubscriptionError> {
        let billing_cycle_days: i32 = row.try_get("billing_cycle_days").map_err(store_error)?;

        Ok(Subscription {
            row_id: RowId(row.try_get("row_id").map_err(store_error)?),
            subscription_id: SubscriptionId(row.try_get("subscription_id").map_err(store_error)?),
            owner_id: OwnerId(row.try_get("owner_id").map_err(store_error)?),
            name: SubscriptionName::new(row.try_get("name").map_err(store_error)?)?,
            price: Price::new(row.try_get("price").map_err(store_error)?)?,
            billing_cycle_days: BillingCycleDays::new(i64::from(billing_cycle_days))?,
            start_date: row.try_get("start_date").map_err(store_error)?,
            logo_reference: row.try_get("logo_reference").map_err(store_error)?,
            active: row.try_get("active").map_err(store_error)?,
            created_at: row.try_get("created_at").map_err(store_error)?,
        })
    }
}

fn store_error(e: sqlx::Error) -> SubscriptionError {
    tracing::error!(error = %e, "Subscription store operation failed");
    SubscriptionError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn insert(&self, row: NewSubscription) -> Result<Subscription, SubscriptionError> {
        let sql = format!(
            r#"
            INSERT INTO subscriptions (
                subscription_id, owner_id, name, price, billing_cycle_days,
                start_date, logo_reference, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            SUBSCRIPTION_COLUMNS
        );

        let inserted = sqlx::query(&sql)
            .bind(row.subscription_id.0)
            .bind(row.owner_id.0)
            .bind(row.name.as_str())
            .bind(row.price.value())
            .bind(row.billing_cycle_days.value())
            .bind(row.start_date)
            .bind(row.logo_reference.as_str())
            .bind(row.active)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        Self::row_to_subscription(inserted)
    }

    async fn find_by_row_id(&self, row_id: RowId) -> Result<Option<Subscription>, SubscriptionError> {
        let sql = format!(
            "SELECT {} FROM subscriptions WHERE row_id = $1",
            SUBSCRIPTION_COLUMNS
        );
        sqlx::query(&sql)
            .bind(row_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?
            .map(Self::row_to_subscription)
            .transpose()
    }

    async fn query(
        &self,
        filter: SubscriptionFilter,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM subscriptions WHERE TRUE",
            SUBSCRIPTION_COLUMNS
        ));

        if let Some(owner_id) = filter.owner_id {
            builder.push(" AND owner_id = ").push_bind(owner_id.0);
        }
        if let Some(subscription_id) = filter.subscription_id {
            builder
                .push(" AND subscription_id = ")
                .push_bind(subscription_id.0);
        }
        if let Some(from) = filter.start_date_from {
            builder.push(" AND start_date >= ").push_bind(from);
        }
        if let Some(to) = filter.start_date_to {
            builder.push(" AND start_date <= ").push_bind(to);
        }
        builder.push(" ORDER BY subscription_id, row_id");

        builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(Self::row_to_subscription)
            .collect()
    }

    async fn delete(
        &self,
        subscription_id: &SubscriptionId,
        owner_id: &OwnerId,
    ) -> Result<u64, SubscriptionError> {
        let result =
            sqlx::query("DELETE FROM subscriptions WHERE subscription_id = $1 AND owner_id = $2")
                .bind(subscription_id.0)
                .bind(owner_id.0)
                .execute(&self.pool)
                .await
                .map_err(store_error)?;

        Ok(result.rows_affected())
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::models::CatalogStatus;
use crate::domain::catalog::models::Currency;
use crate::domain::catalog::models::PlanName;
use crate::domain::catalog::models::ProviderConfig;
use crate::domain::catalog::models::ProviderName;
use crate::domain::catalog::models::ProviderPlan;
use crate::domain::catalog::ports::CatalogRepository;
use crate::domain::subscription::models::BillingCycleDays;
use crate::domain::subscription::models::Price;

const CONFIG_COLUMNS: &str = r#"
    id, provider, description, logo, website, status, created_at, updated_at
"#;

const PLAN_COLUMNS: &str = r#"
    id, subscription_config_id, name, description, price, currency,
    billing_cycle_days, status, created_at, updated_at
"#;

pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_config(row: PgRow) -> Result<ProviderConfig, CatalogError> {
        let status: String = row.try_get("status").map_err(store_error)?;

        Ok(ProviderConfig {
            id: row.try_get("id").map_err(store_error)?,
            provider: ProviderName::new(row.try_get("provider").map_err(store_error)?)?,
            description: row.try_get("description").map_err(store_error)?,
            logo: row.try_get("logo").map_err(store_error)?,
            website: row.try_get("website").map_err(store_error)?,
            status: status.parse::<CatalogStatus>()?,
            plans: Vec::new(),
            created_at: row.try_get("created_at").map_err(store_error)?,
            updated_at: row.try_get("updated_at").map_err(store_error)?,
        })
    }

    /// Returns the owning config id alongside the plan.
    fn row_to_plan(row: PgRow) -> Result<(i64, ProviderPlan), CatalogError> {
        let config_id: i64 = row.try_get("subscription_config_id").map_err(store_error)?;
        let billing_cycle_days: i32 = row.try_get("billing_cycle_days").map_err(store_error)?;
        let currency: String = row.try_get("currency").map_err(store_error)?;
        let status: String = row.try_get("status").map_err(store_error)?;

        let plan = ProviderPlan {
            id: row.try_get("id").map_err(store_error)?,
            name: PlanName::new(row.try_get("name").map_err(store_error)?)?,
            description: row.try_get("description").map_err(store_error)?,
            price: Price::new(row.try_get("price").map_err(store_error)?)?,
            currency: Currency::new(&currency)?,
            billing_cycle_days: BillingCycleDays::new(i64::from(billing_cycle_days))?,
            status: status.parse::<CatalogStatus>()?,
            created_at: row.try_get("created_at").map_err(store_error)?,
            updated_at: row.try_get("updated_at").map_err(store_error)?,
        };

        Ok((config_id, plan))
    }

    /// Attach plans to their configs, keeping plan id order within each config.
    async fn with_plans(
        &self,
        mut configs: Vec<ProviderConfig>,
    ) -> Result<Vec<ProviderConfig>, CatalogError> {
        if configs.is_empty() {
            return Ok(configs);
        }

        let ids: Vec<i64> = configs.iter().map(|c| c.id).collect();
        let sql = format!(
            "SELECT {} FROM subscription_config_plans WHERE subscription_config_id = ANY($1) ORDER BY id",
            PLAN_COLUMNS
        );

        let mut plans_by_config: HashMap<i64, Vec<ProviderPlan>> = HashMap::new();
        for row in sqlx::query(&sql)
            .bind(&ids[..])
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?
        {
            let (config_id, plan) = Self::row_to_plan(row)?;
            plans_by_config.entry(config_id).or_default().push(plan);
        }

        for config in configs.iter_mut() {
            config.plans = plans_by_config.remove(&config.id).unwrap_or_default();
        }

        Ok(configs)
    }
}

fn store_error(e: sqlx::Error) -> CatalogError {
    tracing::error!(error = %e, "Catalog store operation failed");
    CatalogError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn find_all(&self) -> Result<Vec<ProviderConfig>, CatalogError> {
        let sql = format!(
            "SELECT {} FROM subscription_configs ORDER BY provider",
            CONFIG_COLUMNS
        );

        let configs = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(Self::row_to_config)
            .collect::<Result<Vec<_>, _>>()?;

        self.with_plans(configs).await
    }

    async fn find_by_provider(
        &self,
        provider: &ProviderName,
    ) -> Result<Option<ProviderConfig>, CatalogError> {
        let sql = format!(
            "SELECT {} FROM subscription_configs WHERE provider = $1",
            CONFIG_COLUMNS
        );

        let config = sqlx::query(&sql)
            .bind(provider.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?
            .map(Self::row_to_config)
            .transpose()?;

        match config {
            Some(config) => Ok(self.with_plans(vec![config]).await?.pop()),
            None => Ok(None),
        }
    }
}

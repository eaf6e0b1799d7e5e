//! Process-local store for development runs and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::models::ProviderConfig;
use crate::domain::catalog::models::ProviderName;
use crate::domain::catalog::ports::CatalogRepository;
use crate::domain::subscription::errors::SubscriptionError;
use crate::domain::subscription::models::NewSubscription;
use crate::domain::subscription::models::OwnerId;
use crate::domain::subscription::models::RowId;
use crate::domain::subscription::models::Subscription;
use crate::domain::subscription::models::SubscriptionFilter;
use crate::domain::subscription::models::SubscriptionId;
use crate::domain::subscription::ports::SubscriptionRepository;

#[derive(Default)]
struct Table {
    rows: BTreeMap<RowId, Subscription>,
    last_row_id: i64,
}

/// Row ids are assigned from a counter and never reused, deletes included.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    table: RwLock<Table>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn insert(&self, row: NewSubscription) -> Result<Subscription, SubscriptionError> {
        let mut table = self.table.write().await;
        table.last_row_id += 1;

        let stored = Subscription {
            row_id: RowId(table.last_row_id),
            subscription_id: row.subscription_id,
            owner_id: row.owner_id,
            name: row.name,
            price: row.price,
            billing_cycle_days: row.billing_cycle_days,
            start_date: row.start_date,
            logo_reference: row.logo_reference,
            active: row.active,
            created_at: Utc::now(),
        };

        table.rows.insert(stored.row_id, stored.clone());
        Ok(stored)
    }

    async fn find_by_row_id(&self, row_id: RowId) -> Result<Option<Subscription>, SubscriptionError> {
        Ok(self.table.read().await.rows.get(&row_id).cloned())
    }

    async fn query(
        &self,
        filter: SubscriptionFilter,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }

    async fn delete(
        &self,
        subscription_id: &SubscriptionId,
        owner_id: &OwnerId,
    ) -> Result<u64, SubscriptionError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();

        table
            .rows
            .retain(|_, row| !(row.subscription_id == *subscription_id && row.owner_id == *owner_id));

        Ok((before - table.rows.len()) as u64)
    }
}

/// Fixed catalog handed in at construction.
pub struct InMemoryCatalogRepository {
    configs: Vec<ProviderConfig>,
}

impl InMemoryCatalogRepository {
    pub fn new(mut configs: Vec<ProviderConfig>) -> Self {
        configs.sort_by(|a, b| a.provider.cmp(&b.provider));
        Self { configs }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn find_all(&self) -> Result<Vec<ProviderConfig>, CatalogError> {
        Ok(self.configs.clone())
    }

    async fn find_by_provider(
        &self,
        provider: &ProviderName,
    ) -> Result<Option<ProviderConfig>, CatalogError> {
        Ok(self
            .configs
            .iter()
            .find(|config| config.provider == *provider)
            .cloned())
    }
}

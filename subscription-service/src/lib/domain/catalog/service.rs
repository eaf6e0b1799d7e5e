use std::sync::Arc;

use async_trait::async_trait;

use super::errors::CatalogError;
use super::models::ProviderConfig;
use super::models::ProviderName;
use super::ports::CatalogRepository;
use super::ports::CatalogServicePort;

pub struct CatalogService<CR>
where
    CR: CatalogRepository,
{
    catalog_repository: Arc<CR>,
}

impl<CR> CatalogService<CR>
where
    CR: CatalogRepository,
{
    pub fn new(catalog_repository: Arc<CR>) -> Self {
        Self { catalog_repository }
    }
}

#[async_trait]
impl<CR> CatalogServicePort for CatalogService<CR>
where
    CR: CatalogRepository,
{
    async fn list_configs(&self, active_only: bool) -> Result<Vec<ProviderConfig>, CatalogError> {
        let configs = self.catalog_repository.find_all().await?;

        if !active_only {
            return Ok(configs);
        }

        Ok(configs
            .into_iter()
            .filter_map(ProviderConfig::into_active)
            .collect())
    }

    async fn get_config(&self, provider: &ProviderName) -> Result<ProviderConfig, CatalogError> {
        self.catalog_repository
            .find_by_provider(provider)
            .await?
            .ok_or_else(|| CatalogError::NotFound(provider.to_string()))
    }
}

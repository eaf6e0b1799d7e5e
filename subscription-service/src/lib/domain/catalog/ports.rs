use async_trait::async_trait;

use super::errors::CatalogError;
use super::models::ProviderConfig;
use super::models::ProviderName;

/// Port for catalog reads. The catalog is not owned by any user.
#[async_trait]
pub trait CatalogServicePort: Send + Sync + 'static {
    /// Every provider, ordered by name.
    ///
    /// # Arguments
    /// * `active_only` - Drop inactive providers and every plan not on offer
    async fn list_configs(&self, active_only: bool) -> Result<Vec<ProviderConfig>, CatalogError>;

    /// One provider with all of its plans.
    ///
    /// # Errors
    /// * `NotFound` - No provider has this name
    async fn get_config(&self, provider: &ProviderName) -> Result<ProviderConfig, CatalogError>;
}

/// Read access to stored provider configurations.
#[async_trait]
pub trait CatalogRepository: Send + Sync + 'static {
    /// All providers with their plans, ordered by provider name.
    async fn find_all(&self) -> Result<Vec<ProviderConfig>, CatalogError>;

    async fn find_by_provider(
        &self,
        provider: &ProviderName,
    ) -> Result<Option<ProviderConfig>, CatalogError>;
}

use async_trait::async_trait;

use super::errors::SubscriptionError;
use super::models::CreateSubscriptionCommand;
use super::models::ListQuery;
use super::models::NewSubscription;
use super::models::OwnerId;
use super::models::RowId;
use super::models::Subscription;
use super::models::SubscriptionFilter;
use super::models::SubscriptionId;
use super::models::UpdateSubscriptionCommand;

/// Port for subscription domain operations.
///
/// Every operation is scoped to the calling owner.
#[async_trait]
pub trait SubscriptionServicePort: Send + Sync + 'static {
    /// Create a logical subscription with its first version row.
    ///
    /// # Errors
    /// * `AlreadyExists` - A supplied identifier already has rows
    /// * `StoreUnavailable` - Persistence failure
    async fn create(
        &self,
        owner_id: &OwnerId,
        command: CreateSubscriptionCommand,
    ) -> Result<Subscription, SubscriptionError>;

    /// Append a new version row to an existing subscription.
    ///
    /// # Errors
    /// * `NotFound` - No row has this identifier
    /// * `Forbidden` - The subscription belongs to another owner
    async fn update(
        &self,
        subscription_id: &SubscriptionId,
        owner_id: &OwnerId,
        command: UpdateSubscriptionCommand,
    ) -> Result<Subscription, SubscriptionError>;

    /// Current version of every subscription of the owner.
    async fn list(
        &self,
        owner_id: &OwnerId,
        query: ListQuery,
    ) -> Result<Vec<Subscription>, SubscriptionError>;

    /// Current version of one subscription.
    ///
    /// # Errors
    /// * `NotFound` - No rows, or the subscription belongs to another owner
    async fn get(
        &self,
        subscription_id: &SubscriptionId,
        owner_id: &OwnerId,
    ) -> Result<Subscription, SubscriptionError>;

    /// Remove every version row of a subscription.
    ///
    /// # Errors
    /// * `NotFound` - No row has this identifier
    /// * `Forbidden` - The subscription belongs to another owner
    async fn delete(
        &self,
        subscription_id: &SubscriptionId,
        owner_id: &OwnerId,
    ) -> Result<(), SubscriptionError>;
}

/// Persistence operations for append-only subscription rows.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync + 'static {
    /// Insert one version row and return it with its assigned row id.
    async fn insert(&self, row: NewSubscription) -> Result<Subscription, SubscriptionError>;

    async fn find_by_row_id(&self, row_id: RowId) -> Result<Option<Subscription>, SubscriptionError>;

    /// All rows matching the filter, in no particular order.
    async fn query(&self, filter: SubscriptionFilter)
        -> Result<Vec<Subscription>, SubscriptionError>;

    /// Delete every row of the subscription owned by `owner_id`.
    ///
    /// # Returns
    /// Number of rows removed
    async fn delete(
        &self,
        subscription_id: &SubscriptionId,
        owner_id: &OwnerId,
    ) -> Result<u64, SubscriptionError>;
}

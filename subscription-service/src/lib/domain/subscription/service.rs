use std::sync::Arc;

use async_trait::async_trait;

use super::errors::SubscriptionError;
use super::models::CreateSubscriptionCommand;
use super::models::ListQuery;
use super::models::NewSubscription;
use super::models::OwnerId;
use super::models::Subscription;
use super::models::SubscriptionFilter;
use super::models::SubscriptionId;
use super::models::UpdateSubscriptionCommand;
use super::ports::SubscriptionRepository;
use super::ports::SubscriptionServicePort;
use super::resolver;

/// Concrete implementation of SubscriptionServicePort.
///
/// Writes only ever insert version rows; reads resolve the current version
/// from whatever rows the store returns. Generic over repository for testability.
pub struct SubscriptionService<SR>
where
    SR: SubscriptionRepository,
{
    subscription_repository: Arc<SR>,
}

impl<SR> SubscriptionService<SR>
where
    SR: SubscriptionRepository,
{
    pub fn new(subscription_repository: Arc<SR>) -> Self {
        Self {
            subscription_repository,
        }
    }

    async fn rows_of(
        &self,
        subscription_id: &SubscriptionId,
        owner_id: Option<OwnerId>,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        self.subscription_repository
            .query(SubscriptionFilter {
                owner_id,
                subscription_id: Some(*subscription_id),
                ..Default::default()
            })
            .await
    }

    /// Current version of a subscription, checked against the caller.
    async fn current_owned(
        &self,
        subscription_id: &SubscriptionId,
        owner_id: &OwnerId,
    ) -> Result<Subscription, SubscriptionError> {
        let current = resolver::resolve_one(self.rows_of(subscription_id, None).await?)
            .ok_or(SubscriptionError::NotFound(*subscription_id))?;

        if current.owner_id != *owner_id {
            tracing::warn!(
                subscription_id = %subscription_id,
                owner_id = %owner_id,
                "Access to another owner's subscription rejected"
            );
            return Err(SubscriptionError::Forbidden(*subscription_id));
        }

        Ok(current)
    }
}

#[async_trait]
impl<SR> SubscriptionServicePort for SubscriptionService<SR>
where
    SR: SubscriptionRepository + 'static,
{
    async fn create(
        &self,
        owner_id: &OwnerId,
        command: CreateSubscriptionCommand,
    ) -> Result<Subscription, SubscriptionError> {
        let subscription_id = match command.subscription_id {
            Some(id) => {
                if !self.rows_of(&id, None).await?.is_empty() {
                    return Err(SubscriptionError::AlreadyExists(id));
                }
                id
            }
            None => SubscriptionId::new(),
        };

        let created = self
            .subscription_repository
            .insert(NewSubscription {
                subscription_id,
                owner_id: *owner_id,
                name: command.name,
                price: command.price,
                billing_cycle_days: command.billing_cycle_days,
                start_date: command.start_date,
                logo_reference: command.logo_reference,
                active: true,
            })
            .await?;

        tracing::info!(
            subscription_id = %created.subscription_id,
            row_id = %created.row_id,
            "Subscription created"
        );

        Ok(created)
    }

    async fn update(
        &self,
        subscription_id: &SubscriptionId,
        owner_id: &OwnerId,
        command: UpdateSubscriptionCommand,
    ) -> Result<Subscription, SubscriptionError> {
        let current = self.current_owned(subscription_id, owner_id).await?;

        let version = self
            .subscription_repository
            .insert(NewSubscription {
                subscription_id: current.subscription_id,
                owner_id: current.owner_id,
                name: command.name,
                price: command.price,
                billing_cycle_days: current.billing_cycle_days,
                start_date: command.start_date,
                logo_reference: command.logo_reference,
                active: current.active,
            })
            .await?;

        tracing::info!(
            subscription_id = %version.subscription_id,
            previous_row_id = %current.row_id,
            row_id = %version.row_id,
            "Subscription version appended"
        );

        Ok(version)
    }

    async fn list(
        &self,
        owner_id: &OwnerId,
        query: ListQuery,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        let rows = self
            .subscription_repository
            .query(SubscriptionFilter {
                owner_id: Some(*owner_id),
                subscription_id: None,
                start_date_from: query.start_date_from(),
                start_date_to: query.start_date_to(),
            })
            .await?;

        let mut current = resolver::resolve(rows);
        if let Some(order) = query.sort() {
            resolver::sort(&mut current, order);
        }

        Ok(current)
    }

    async fn get(
        &self,
        subscription_id: &SubscriptionId,
        owner_id: &OwnerId,
    ) -> Result<Subscription, SubscriptionError> {
        resolver::resolve_one(self.rows_of(subscription_id, Some(*owner_id)).await?)
            .ok_or(SubscriptionError::NotFound(*subscription_id))
    }

    async fn delete(
        &self,
        subscription_id: &SubscriptionId,
        owner_id: &OwnerId,
    ) -> Result<(), SubscriptionError> {
        self.current_owned(subscription_id, owner_id).await?;

        let removed = self
            .subscription_repository
            .delete(subscription_id, owner_id)
            .await?;

        tracing::info!(
            subscription_id = %subscription_id,
            rows_removed = removed,
            "Subscription deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use chrono::Utc;
    use mockall::mock;
    use uuid::Uuid;

    use super::*;
    use crate::outbound::repositories::InMemorySubscriptionRepository;
    use crate::subscription::models::BillingCycleDays;
    use crate::subscription::models::Price;
    use crate::subscription::models::RowId;
    use crate::subscription::models::SortOrder;
    use crate::subscription::models::SubscriptionName;

    mock! {
        pub TestSubscriptionRepository {}

        #[async_trait]
        impl SubscriptionRepository for TestSubscriptionRepository {
            async fn insert(&self, row: NewSubscription) -> Result<Subscription, SubscriptionError>;
            async fn find_by_row_id(&self, row_id: RowId) -> Result<Option<Subscription>, SubscriptionError>;
            async fn query(&self, filter: SubscriptionFilter) -> Result<Vec<Subscription>, SubscriptionError>;
            async fn delete(&self, subscription_id: &SubscriptionId, owner_id: &OwnerId) -> Result<u64, SubscriptionError>;
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn owner() -> OwnerId {
        OwnerId(Uuid::new_v4())
    }

    fn create_command(name: &str, price: f64, cycle: i64, start: NaiveDate) -> CreateSubscriptionCommand {
        CreateSubscriptionCommand {
            subscription_id: None,
            name: SubscriptionName::new(name.to_string()).unwrap(),
            price: Price::new(price).unwrap(),
            billing_cycle_days: BillingCycleDays::new(cycle).unwrap(),
            start_date: start,
            logo_reference: String::new(),
        }
    }

    fn update_command(name: &str, price: f64, start: NaiveDate) -> UpdateSubscriptionCommand {
        UpdateSubscriptionCommand {
            name: SubscriptionName::new(name.to_string()).unwrap(),
            price: Price::new(price).unwrap(),
            start_date: start,
            logo_reference: "logo.png".to_string(),
        }
    }

    fn stored(owner_id: OwnerId, subscription_id: SubscriptionId, row_id: i64) -> Subscription {
        Subscription {
            row_id: RowId(row_id),
            subscription_id,
            owner_id,
            name: SubscriptionName::new("Music".to_string()).unwrap(),
            price: Price::new(9.99).unwrap(),
            billing_cycle_days: BillingCycleDays::new(30).unwrap(),
            start_date: date(2024, 1, 1),
            logo_reference: String::new(),
            active: true,
            created_at: Utc::now(),
        }
    }

    fn in_memory_service() -> (
        SubscriptionService<InMemorySubscriptionRepository>,
        Arc<InMemorySubscriptionRepository>,
    ) {
        let repository = Arc::new(InMemorySubscriptionRepository::new());
        (SubscriptionService::new(Arc::clone(&repository)), repository)
    }

    #[tokio::test]
    async fn test_create_assigns_new_identifier() {
        let mut repository = MockTestSubscriptionRepository::new();
        let owner_id = owner();

        repository
            .expect_insert()
            .withf(move |row| row.owner_id == owner_id && row.active && row.name.as_str() == "Music")
            .times(1)
            .returning(|row| {
                Ok(Subscription {
                    row_id: RowId(1),
                    subscription_id: row.subscription_id,
                    owner_id: row.owner_id,
                    name: row.name,
                    price: row.price,
                    billing_cycle_days: row.billing_cycle_days,
                    start_date: row.start_date,
                    logo_reference: row.logo_reference,
                    active: row.active,
                    created_at: Utc::now(),
                })
            });
        repository.expect_query().times(0);

        let service = SubscriptionService::new(Arc::new(repository));
        let created = service
            .create(&owner_id, create_command("Music", 9.99, 30, date(2024, 1, 1)))
            .await
            .unwrap();

        assert_eq!(created.row_id, RowId(1));
        assert_eq!(created.owner_id, owner_id);
    }

    #[tokio::test]
    async fn test_create_rejects_existing_identifier() {
        let mut repository = MockTestSubscriptionRepository::new();
        let existing = SubscriptionId::new();
        let someone_else = owner();

        repository
            .expect_query()
            .withf(move |f| f.subscription_id == Some(existing) && f.owner_id.is_none())
            .times(1)
            .returning(move |_| Ok(vec![stored(someone_else, existing, 1)]));
        repository.expect_insert().times(0);

        let service = SubscriptionService::new(Arc::new(repository));
        let mut command = create_command("Music", 9.99, 30, date(2024, 1, 1));
        command.subscription_id = Some(existing);

        let result = service.create(&owner(), command).await;

        assert!(matches!(result, Err(SubscriptionError::AlreadyExists(id)) if id == existing));
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let mut repository = MockTestSubscriptionRepository::new();
        repository.expect_query().times(1).returning(|_| Ok(vec![]));
        repository.expect_insert().times(0);

        let service = SubscriptionService::new(Arc::new(repository));
        let result = service
            .update(
                &SubscriptionId::new(),
                &owner(),
                update_command("Music", 9.99, date(2024, 2, 1)),
            )
            .await;

        assert!(matches!(result, Err(SubscriptionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_forbidden_for_other_owner() {
        let mut repository = MockTestSubscriptionRepository::new();
        let id = SubscriptionId::new();
        let real_owner = owner();

        repository
            .expect_query()
            .times(1)
            .returning(move |_| Ok(vec![stored(real_owner, id, 1)]));
        repository.expect_insert().times(0);

        let service = SubscriptionService::new(Arc::new(repository));
        let result = service
            .update(&id, &owner(), update_command("Hijacked", 0.0, date(2024, 2, 1)))
            .await;

        assert!(matches!(result, Err(SubscriptionError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_forbidden_for_other_owner() {
        let mut repository = MockTestSubscriptionRepository::new();
        let id = SubscriptionId::new();
        let real_owner = owner();

        repository
            .expect_query()
            .times(1)
            .returning(move |_| Ok(vec![stored(real_owner, id, 1)]));
        repository.expect_delete().times(0);

        let service = SubscriptionService::new(Arc::new(repository));
        let result = service.delete(&id, &owner()).await;

        assert!(matches!(result, Err(SubscriptionError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let mut repository = MockTestSubscriptionRepository::new();
        repository.expect_query().times(1).returning(|_| Ok(vec![]));
        repository.expect_delete().times(0);

        let service = SubscriptionService::new(Arc::new(repository));
        let result = service.delete(&SubscriptionId::new(), &owner()).await;

        assert!(matches!(result, Err(SubscriptionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut repository = MockTestSubscriptionRepository::new();
        repository
            .expect_query()
            .times(1)
            .returning(|_| Err(SubscriptionError::StoreUnavailable("connection refused".into())));

        let service = SubscriptionService::new(Arc::new(repository));
        let result = service.list(&owner(), ListQuery::default()).await;

        assert!(matches!(result, Err(SubscriptionError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_music_premium_scenario() {
        let (service, _) = in_memory_service();
        let u1 = owner();

        let created = service
            .create(&u1, create_command("Music", 9.99, 30, date(2024, 1, 1)))
            .await
            .unwrap();

        let listed = service.list(&u1, ListQuery::default()).await.unwrap();
        assert_eq!(listed, vec![created.clone()]);

        service
            .update(
                &created.subscription_id,
                &u1,
                update_command("Music Premium", 12.99, date(2024, 2, 1)),
            )
            .await
            .unwrap();

        let listed = service.list(&u1, ListQuery::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].subscription_id, created.subscription_id);
        assert_eq!(listed[0].name.as_str(), "Music Premium");
        assert_eq!(listed[0].price.value(), 12.99);
        assert_eq!(listed[0].billing_cycle_days.value(), 30);
    }

    #[tokio::test]
    async fn test_update_leaves_prior_row_untouched() {
        let (service, repository) = in_memory_service();
        let u1 = owner();

        let original = service
            .create(&u1, create_command("Music", 9.99, 30, date(2024, 1, 1)))
            .await
            .unwrap();

        let version = service
            .update(
                &original.subscription_id,
                &u1,
                update_command("Music Premium", 12.99, date(2024, 2, 1)),
            )
            .await
            .unwrap();

        assert_ne!(version.row_id, original.row_id);
        assert_eq!(
            repository.find_by_row_id(original.row_id).await.unwrap(),
            Some(original)
        );
    }

    #[tokio::test]
    async fn test_update_carries_billing_cycle_of_current_version() {
        let (service, _) = in_memory_service();
        let u1 = owner();

        let created = service
            .create(&u1, create_command("Gym", 40.0, 28, date(2024, 1, 1)))
            .await
            .unwrap();

        for (month, price) in [(2, 42.0), (3, 45.0)] {
            let version = service
                .update(
                    &created.subscription_id,
                    &u1,
                    update_command("Gym", price, date(2024, month, 1)),
                )
                .await
                .unwrap();
            assert_eq!(version.billing_cycle_days.value(), 28);
        }
    }

    #[tokio::test]
    async fn test_backdated_update_does_not_become_current() {
        let (service, _) = in_memory_service();
        let u1 = owner();

        let created = service
            .create(&u1, create_command("News", 5.0, 30, date(2024, 3, 1)))
            .await
            .unwrap();

        service
            .update(
                &created.subscription_id,
                &u1,
                update_command("News Archive", 3.0, date(2024, 1, 1)),
            )
            .await
            .unwrap();

        let current = service.get(&created.subscription_id, &u1).await.unwrap();
        assert_eq!(current.row_id, created.row_id);
    }

    #[tokio::test]
    async fn test_get_hides_other_owners_subscription() {
        let (service, _) = in_memory_service();
        let u1 = owner();

        let created = service
            .create(&u1, create_command("Music", 9.99, 30, date(2024, 1, 1)))
            .await
            .unwrap();

        let result = service.get(&created.subscription_id, &owner()).await;

        assert!(matches!(result, Err(SubscriptionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let (service, _) = in_memory_service();
        let u1 = owner();

        service
            .create(&u1, create_command("Video", 15.0, 30, date(2024, 1, 10)))
            .await
            .unwrap();
        service
            .create(&u1, create_command("Music", 9.99, 30, date(2024, 2, 10)))
            .await
            .unwrap();
        service
            .create(&u1, create_command("Cloud", 2.99, 30, date(2024, 3, 10)))
            .await
            .unwrap();
        service
            .create(&owner(), create_command("Other", 1.0, 30, date(2024, 2, 10)))
            .await
            .unwrap();

        let query = ListQuery::new(
            Some(date(2024, 2, 1)),
            Some(date(2024, 3, 31)),
            Some(SortOrder::PriceAsc),
        )
        .unwrap();
        let listed = service.list(&u1, query).await.unwrap();

        let names: Vec<&str> = listed.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Cloud", "Music"]);
    }

    #[tokio::test]
    async fn test_delete_removes_every_version() {
        let (service, repository) = in_memory_service();
        let u1 = owner();

        let created = service
            .create(&u1, create_command("Music", 9.99, 30, date(2024, 1, 1)))
            .await
            .unwrap();
        service
            .update(
                &created.subscription_id,
                &u1,
                update_command("Music Premium", 12.99, date(2024, 2, 1)),
            )
            .await
            .unwrap();

        service.delete(&created.subscription_id, &u1).await.unwrap();

        assert!(service.list(&u1, ListQuery::default()).await.unwrap().is_empty());
        assert_eq!(repository.find_by_row_id(created.row_id).await.unwrap(), None);
    }
}

pub mod catalog;
pub mod memory;
pub mod subscription;

pub use catalog::PostgresCatalogRepository;
pub use memory::InMemoryCatalogRepository;
pub use memory::InMemorySubscriptionRepository;
pub use subscription::PostgresSubscriptionRepository;

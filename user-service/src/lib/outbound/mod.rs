pub mod notifier;
pub mod oauth;
pub mod repositories;

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::catalog;
pub use domain::subscription;
pub use outbound::repositories;

use thiserror::Error;

use crate::domain::subscription::errors::BillingCycleError;
use crate::domain::subscription::errors::PriceError;

/// Error for ProviderName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderNameError {
    #[error("Provider name is empty")]
    Empty,

    #[error("Provider name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for PlanName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanNameError {
    #[error("Plan name is empty")]
    Empty,
}

/// Error for Currency validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("Currency must be a three-letter ISO 4217 code, got {0:?}")]
    InvalidCode(String),
}

/// Error for catalog status parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogStatusError {
    #[error("Unknown catalog status: {0}")]
    Unknown(String),
}

/// Top-level error for catalog operations
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Invalid provider: {0}")]
    InvalidProvider(#[from] ProviderNameError),

    // Stored records failing validation
    #[error("Invalid plan name: {0}")]
    InvalidPlanName(#[from] PlanNameError),

    #[error("Invalid plan price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("Invalid plan billing cycle: {0}")]
    InvalidBillingCycle(#[from] BillingCycleError),

    #[error("Invalid currency: {0}")]
    InvalidCurrency(#[from] CurrencyError),

    #[error("Invalid status: {0}")]
    InvalidStatus(#[from] CatalogStatusError),

    #[error("Provider not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

use thiserror::Error;

use super::models::SubscriptionId;

/// Error for SubscriptionId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubscriptionIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for OwnerId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OwnerIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for SubscriptionName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubscriptionNameError {
    #[error("Subscription name is empty")]
    Empty,

    #[error("Subscription name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Price validation failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PriceError {
    #[error("Price must not be negative, got {0}")]
    Negative(f64),

    #[error("Price must be a finite number")]
    NotFinite,
}

/// Error for BillingCycleDays validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BillingCycleError {
    #[error("Billing cycle must be a positive number of days, got {0}")]
    NotPositive(i64),

    #[error("Billing cycle too long: {0} days")]
    TooLong(i64),
}

/// Error for start date range validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("start_date_from {from} is after start_date_to {to}")]
    Inverted {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },
}

/// Error for unknown list sort orders
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SortOrderError {
    #[error("Unknown sort order: {0}")]
    Unknown(String),
}

/// Top-level error for all subscription operations
#[derive(Debug, Clone, Error)]
pub enum SubscriptionError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid subscription ID: {0}")]
    InvalidSubscriptionId(#[from] SubscriptionIdError),

    #[error("Invalid owner ID: {0}")]
    InvalidOwnerId(#[from] OwnerIdError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] SubscriptionNameError),

    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("Invalid billing cycle: {0}")]
    InvalidBillingCycle(#[from] BillingCycleError),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(#[from] DateRangeError),

    #[error("Invalid sort order: {0}")]
    InvalidSortOrder(#[from] SortOrderError),

    // Domain-level errors
    #[error("Subscription not found: {0}")]
    NotFound(SubscriptionId),

    #[error("Subscription {0} belongs to another user")]
    Forbidden(SubscriptionId),

    #[error("Subscription already exists: {0}")]
    AlreadyExists(SubscriptionId),

    // Infrastructure errors
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

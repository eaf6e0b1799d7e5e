//! Read-only catalog of known subscription providers and their plans.
//!
//! The catalog is reference data that clients use to prefill a new
//! subscription. Tracked subscriptions never point back at it.

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use super::errors::CatalogStatusError;
use super::errors::CurrencyError;
use super::errors::PlanNameError;
use super::errors::ProviderNameError;
use crate::domain::subscription::models::BillingCycleDays;
use crate::domain::subscription::models::Price;

/// A provider with every plan it has offered.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub id: i64,
    pub provider: ProviderName,
    pub description: String,
    pub logo: String,
    pub website: String,
    pub status: CatalogStatus,
    pub plans: Vec<ProviderPlan>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProviderConfig {
    pub fn is_active(&self) -> bool {
        self.status == CatalogStatus::Active
    }

    /// Plans currently on offer.
    pub fn active_plans(&self) -> impl Iterator<Item = &ProviderPlan> {
        self.plans.iter().filter(|plan| plan.is_active())
    }

    /// The provider restricted to its active plans, or `None` when the
    /// provider itself is not active.
    pub fn into_active(self) -> Option<Self> {
        if !self.is_active() {
            return None;
        }

        let plans = self.active_plans().cloned().collect();
        Some(Self { plans, ..self })
    }
}

/// One priced plan of a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPlan {
    pub id: i64,
    pub name: PlanName,
    pub description: String,
    pub price: Price,
    pub currency: Currency,
    pub billing_cycle_days: BillingCycleDays,
    pub status: CatalogStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProviderPlan {
    pub fn is_active(&self) -> bool {
        self.status == CatalogStatus::Active
    }
}

/// Unique provider name, the lookup key of the catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProviderName(String);

impl ProviderName {
    const MAX_LENGTH: usize = 100;

    /// Create a new valid provider name.
    ///
    /// # Errors
    /// * `Empty` - Name is empty or whitespace only
    /// * `TooLong` - More than 100 characters
    pub fn new(name: String) -> Result<Self, ProviderNameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ProviderNameError::Empty);
        }

        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(ProviderNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanName(String);

impl PlanName {
    pub fn new(name: String) -> Result<Self, PlanNameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PlanNameError::Empty);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ISO 4217 alphabetic code, stored upper case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency(String);

impl Currency {
    /// # Errors
    /// * `InvalidCode` - Not exactly three ASCII letters
    pub fn new(code: &str) -> Result<Self, CurrencyError> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CurrencyError::InvalidCode(code.to_string()));
        }

        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle of a provider or plan in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    Active,
    Inactive,
    Deprecated,
}

impl CatalogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogStatus::Active => "active",
            CatalogStatus::Inactive => "inactive",
            CatalogStatus::Deprecated => "deprecated",
        }
    }
}

impl FromStr for CatalogStatus {
    type Err = CatalogStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CatalogStatus::Active),
            "inactive" => Ok(CatalogStatus::Inactive),
            "deprecated" => Ok(CatalogStatus::Deprecated),
            other => Err(CatalogStatusError::Unknown(other.to_string())),
        }
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use uuid::Uuid;

use super::errors::BillingCycleError;
use super::errors::DateRangeError;
use super::errors::OwnerIdError;
use super::errors::PriceError;
use super::errors::SortOrderError;
use super::errors::SubscriptionIdError;
use super::errors::SubscriptionNameError;

/// One immutable version row of a logical subscription.
///
/// Rows are only ever inserted. The current state of a subscription is the
/// row picked by [`resolve`](super::resolver::resolve), never a stored flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub row_id: RowId,
    pub subscription_id: SubscriptionId,
    pub owner_id: OwnerId,
    pub name: SubscriptionName,
    pub price: Price,
    pub billing_cycle_days: BillingCycleDays,
    pub start_date: NaiveDate,
    pub logo_reference: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A version row before the store has assigned its row id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub subscription_id: SubscriptionId,
    pub owner_id: OwnerId,
    pub name: SubscriptionName,
    pub price: Price,
    pub billing_cycle_days: BillingCycleDays,
    pub start_date: NaiveDate,
    pub logo_reference: String,
    pub active: bool,
}

/// Store-assigned identifier of a single version row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(pub i64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stable identifier shared by every version of one logical subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Generate a new random subscription ID.
    ///
    /// # Returns
    /// SubscriptionId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a subscription ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, SubscriptionIdError> {
        Uuid::parse_str(s)
            .map(SubscriptionId)
            .map_err(|e| SubscriptionIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of the owning user, taken from the session token subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    pub fn from_string(s: &str) -> Result<Self, OwnerIdError> {
        Uuid::parse_str(s)
            .map(OwnerId)
            .map_err(|e| OwnerIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Subscription name value type
///
/// Non-empty after trimming, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionName(String);

impl SubscriptionName {
    const MAX_LENGTH: usize = 100;

    /// Create a new valid subscription name.
    ///
    /// # Errors
    /// * `Empty` - Name is empty or whitespace only
    /// * `TooLong` - More than 100 characters
    pub fn new(name: String) -> Result<Self, SubscriptionNameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SubscriptionNameError::Empty);
        }

        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(SubscriptionNameError::TooLong {
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

impl fmt::Display for SubscriptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Recurring price, finite and non-negative
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    /// # Errors
    /// * `NotFinite` - NaN or infinite
    /// * `Negative` - Less than zero
    pub fn new(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::NotFinite);
        }
        if value < 0.0 {
            return Err(PriceError::Negative(value));
        }

        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Length of one billing period in days, strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BillingCycleDays(i32);

impl BillingCycleDays {
    /// # Errors
    /// * `NotPositive` - Zero or negative
    /// * `TooLong` - Does not fit the stored integer column
    pub fn new(days: i64) -> Result<Self, BillingCycleError> {
        if days <= 0 {
            return Err(BillingCycleError::NotPositive(days));
        }

        i32::try_from(days)
            .map(Self)
            .map_err(|_| BillingCycleError::TooLong(days))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Command to create a subscription.
///
/// `subscription_id` is normally absent; a supplied one must not already exist.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub subscription_id: Option<SubscriptionId>,
    pub name: SubscriptionName,
    pub price: Price,
    pub billing_cycle_days: BillingCycleDays,
    pub start_date: NaiveDate,
    pub logo_reference: String,
}

/// Command to record a new version of a subscription.
///
/// There is no billing cycle here: it is carried forward from the current
/// version and cannot be changed after creation.
#[derive(Debug, Clone)]
pub struct UpdateSubscriptionCommand {
    pub name: SubscriptionName,
    pub price: Price,
    pub start_date: NaiveDate,
    pub logo_reference: String,
}

/// Store-level row selection. Every present field narrows the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub owner_id: Option<OwnerId>,
    pub subscription_id: Option<SubscriptionId>,
    /// Inclusive lower bound on `start_date`
    pub start_date_from: Option<NaiveDate>,
    /// Inclusive upper bound on `start_date`
    pub start_date_to: Option<NaiveDate>,
}

impl SubscriptionFilter {
    pub fn matches(&self, row: &Subscription) -> bool {
        self.owner_id.map_or(true, |id| row.owner_id == id)
            && self
                .subscription_id
                .map_or(true, |id| row.subscription_id == id)
            && self.start_date_from.map_or(true, |d| row.start_date >= d)
            && self.start_date_to.map_or(true, |d| row.start_date <= d)
    }
}

/// Explicit ordering for listed subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    StartDateAsc,
    StartDateDesc,
    PriceAsc,
    PriceDesc,
}

impl FromStr for SortOrder {
    type Err = SortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start_date_asc" => Ok(SortOrder::StartDateAsc),
            "start_date_desc" => Ok(SortOrder::StartDateDesc),
            "price_asc" => Ok(SortOrder::PriceAsc),
            "price_desc" => Ok(SortOrder::PriceDesc),
            other => Err(SortOrderError::Unknown(other.to_string())),
        }
    }
}

/// Listing parameters: an optional start date window and sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    start_date_from: Option<NaiveDate>,
    start_date_to: Option<NaiveDate>,
    sort: Option<SortOrder>,
}

impl ListQuery {
    /// # Errors
    /// * `Inverted` - Both bounds given and `from` is after `to`
    pub fn new(
        start_date_from: Option<NaiveDate>,
        start_date_to: Option<NaiveDate>,
        sort: Option<SortOrder>,
    ) -> Result<Self, DateRangeError> {
        if let (Some(from), Some(to)) = (start_date_from, start_date_to) {
            if from > to {
                return Err(DateRangeError::Inverted { from, to });
            }
        }

        Ok(Self {
            start_date_from,
            start_date_to,
            sort,
        })
    }

    pub fn start_date_from(&self) -> Option<NaiveDate> {
        self.start_date_from
    }

    pub fn start_date_to(&self) -> Option<NaiveDate> {
        self.start_date_to
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_name_validation() {
        assert_eq!(
            SubscriptionName::new("  Music  ".to_string()).unwrap().as_str(),
            "Music"
        );
        assert_eq!(
            SubscriptionName::new("   ".to_string()),
            Err(SubscriptionNameError::Empty)
        );
        assert!(matches!(
            SubscriptionName::new("x".repeat(101)),
            Err(SubscriptionNameError::TooLong { max: 100, actual: 101 })
        ));
        assert!(SubscriptionName::new("x".repeat(100)).is_ok());
    }

    #[test]
    fn test_price_validation() {
        assert_eq!(Price::new(0.0).unwrap().value(), 0.0);
        assert_eq!(Price::new(9.99).unwrap().value(), 9.99);
        assert_eq!(Price::new(-0.01), Err(PriceError::Negative(-0.01)));
        assert_eq!(Price::new(f64::NAN), Err(PriceError::NotFinite));
        assert_eq!(Price::new(f64::INFINITY), Err(PriceError::NotFinite));
    }

    #[test]
    fn test_billing_cycle_validation() {
        assert_eq!(BillingCycleDays::new(30).unwrap().value(), 30);
        assert_eq!(
            BillingCycleDays::new(0),
            Err(BillingCycleError::NotPositive(0))
        );
        assert_eq!(
            BillingCycleDays::new(-7),
            Err(BillingCycleError::NotPositive(-7))
        );
        assert!(matches!(
            BillingCycleDays::new(i64::from(i32::MAX) + 1),
            Err(BillingCycleError::TooLong(_))
        ));
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("price_desc".parse::<SortOrder>(), Ok(SortOrder::PriceDesc));
        assert_eq!(
            "start_date_asc".parse::<SortOrder>(),
            Ok(SortOrder::StartDateAsc)
        );
        assert!("newest".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_list_query_rejects_inverted_range() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        assert!(ListQuery::new(Some(jan), Some(feb), None).is_ok());
        assert!(ListQuery::new(Some(jan), Some(jan), None).is_ok());
        assert!(matches!(
            ListQuery::new(Some(feb), Some(jan), None),
            Err(DateRangeError::Inverted { .. })
        ));
    }

    #[test]
    fn test_filter_bounds_are_inclusive() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let row = Subscription {
            row_id: RowId(1),
            subscription_id: SubscriptionId::new(),
            owner_id: OwnerId(Uuid::new_v4()),
            name: SubscriptionName::new("Video".to_string()).unwrap(),
            price: Price::new(5.0).unwrap(),
            billing_cycle_days: BillingCycleDays::new(30).unwrap(),
            start_date: date,
            logo_reference: String::new(),
            active: true,
            created_at: Utc::now(),
        };

        let on_bounds = SubscriptionFilter {
            start_date_from: Some(date),
            start_date_to: Some(date),
            ..Default::default()
        };
        assert!(on_bounds.matches(&row));

        let other_owner = SubscriptionFilter {
            owner_id: Some(OwnerId(Uuid::new_v4())),
            ..Default::default()
        };
        assert!(!other_owner.matches(&row));
    }
}

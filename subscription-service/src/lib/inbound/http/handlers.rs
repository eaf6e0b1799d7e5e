use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Serialize;

use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::models::ProviderConfig;
use crate::domain::catalog::models::ProviderPlan;
use crate::domain::subscription::models::Subscription;
use crate::subscription::errors::SubscriptionError;

pub mod create_subscription;
pub mod delete_subscription;
pub mod get_provider_config;
pub mod get_subscription;
pub mod list_provider_configs;
pub mod list_subscriptions;
pub mod update_subscription;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    NotFound(String),
    Forbidden(String),
    Conflict(String),
    Unauthorized(String),
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<SubscriptionError> for ApiError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::InvalidSubscriptionId(_)
            | SubscriptionError::InvalidOwnerId(_)
            | SubscriptionError::InvalidName(_)
            | SubscriptionError::InvalidPrice(_)
            | SubscriptionError::InvalidBillingCycle(_)
            | SubscriptionError::InvalidDateRange(_)
            | SubscriptionError::InvalidSortOrder(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            SubscriptionError::NotFound(_) => ApiError::NotFound(err.to_string()),
            SubscriptionError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            SubscriptionError::AlreadyExists(_) => ApiError::Conflict(err.to_string()),
            SubscriptionError::StoreUnavailable(_) => {
                ApiError::ServiceUnavailable(err.to_string())
            }
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidProvider(_) => ApiError::UnprocessableEntity(err.to_string()),
            CatalogError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CatalogError::StoreUnavailable(_) => ApiError::ServiceUnavailable(err.to_string()),
            CatalogError::InvalidPlanName(_)
            | CatalogError::InvalidPrice(_)
            | CatalogError::InvalidBillingCycle(_)
            | CatalogError::InvalidCurrency(_)
            | CatalogError::InvalidStatus(_) => {
                tracing::error!(error = %err, "Stored catalog record is invalid");
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Current version of a subscription as returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionData {
    pub subscription_id: String,
    pub row_id: i64,
    pub name: String,
    pub price: f64,
    pub billing_cycle_days: i32,
    pub start_date: NaiveDate,
    pub logo_reference: String,
    pub active: bool,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Subscription> for SubscriptionData {
    fn from(subscription: &Subscription) -> Self {
        Self {
            subscription_id: subscription.subscription_id.to_string(),
            row_id: subscription.row_id.0,
            name: subscription.name.as_str().to_string(),
            price: subscription.price.value(),
            billing_cycle_days: subscription.billing_cycle_days.value(),
            start_date: subscription.start_date,
            logo_reference: subscription.logo_reference.clone(),
            active: subscription.active,
            owner_id: subscription.owner_id.to_string(),
            created_at: subscription.created_at,
        }
    }
}

/// Catalog entry as returned by the catalog endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderConfigData {
    pub id: i64,
    pub provider: String,
    pub description: String,
    pub logo: String,
    pub website: String,
    pub status: String,
    pub plans: Vec<ProviderPlanData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderPlanData {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub billing_cycle_days: i32,
    pub status: String,
}

impl From<&ProviderConfig> for ProviderConfigData {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            id: config.id,
            provider: config.provider.to_string(),
            description: config.description.clone(),
            logo: config.logo.clone(),
            website: config.website.clone(),
            status: config.status.as_str().to_string(),
            plans: config.plans.iter().map(ProviderPlanData::from).collect(),
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

impl From<&ProviderPlan> for ProviderPlanData {
    fn from(plan: &ProviderPlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name.as_str().to_string(),
            description: plan.description.clone(),
            price: plan.price.value(),
            currency: plan.currency.as_str().to_string(),
            billing_cycle_days: plan.billing_cycle_days.value(),
            status: plan.status.as_str().to_string(),
        }
    }
}

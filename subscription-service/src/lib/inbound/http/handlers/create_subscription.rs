use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SubscriptionData;
use crate::domain::subscription::models::BillingCycleDays;
use crate::domain::subscription::models::CreateSubscriptionCommand;
use crate::domain::subscription::models::Price;
use crate::domain::subscription::models::SubscriptionId;
use crate::domain::subscription::models::SubscriptionName;
use crate::domain::subscription::ports::SubscriptionServicePort;
use crate::inbound::http::middleware::AuthenticatedOwner;
use crate::inbound::http::router::AppState;
use crate::subscription::errors::SubscriptionError;

pub async fn create_subscription(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedOwner>,
    Json(body): Json<CreateSubscriptionRequest>,
) -> Result<ApiSuccess<SubscriptionData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .subscription_service
        .create(&caller.owner_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref subscription| ApiSuccess::new(StatusCode::CREATED, subscription.into()))
}

/// HTTP request body for creating a subscription (raw JSON)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateSubscriptionRequest {
    subscription_id: Option<String>,
    name: String,
    price: f64,
    billing_cycle_days: i64,
    start_date: NaiveDate,
    #[serde(default)]
    logo_reference: String,
}

impl CreateSubscriptionRequest {
    fn try_into_command(self) -> Result<CreateSubscriptionCommand, SubscriptionError> {
        let subscription_id = self
            .subscription_id
            .as_deref()
            .map(SubscriptionId::from_string)
            .transpose()?;

        Ok(CreateSubscriptionCommand {
            subscription_id,
            name: SubscriptionName::new(self.name)?,
            price: Price::new(self.price)?,
            billing_cycle_days: BillingCycleDays::new(self.billing_cycle_days)?,
            start_date: self.start_date,
            logo_reference: self.logo_reference,
        })
    }
}

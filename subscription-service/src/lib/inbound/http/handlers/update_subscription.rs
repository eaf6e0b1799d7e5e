use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SubscriptionData;
use crate::domain::subscription::models::Price;
use crate::domain::subscription::models::SubscriptionId;
use crate::domain::subscription::models::SubscriptionName;
use crate::domain::subscription::models::UpdateSubscriptionCommand;
use crate::domain::subscription::ports::SubscriptionServicePort;
use crate::inbound::http::middleware::AuthenticatedOwner;
use crate::inbound::http::router::AppState;
use crate::subscription::errors::SubscriptionError;

/// HTTP request body for a new subscription version (raw JSON).
///
/// A `billing_cycle_days` field, if sent, is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateSubscriptionRequest {
    name: String,
    price: f64,
    start_date: NaiveDate,
    #[serde(default)]
    logo_reference: String,
}

impl UpdateSubscriptionRequest {
    fn try_into_command(self) -> Result<UpdateSubscriptionCommand, SubscriptionError> {
        Ok(UpdateSubscriptionCommand {
            name: SubscriptionName::new(self.name)?,
            price: Price::new(self.price)?,
            start_date: self.start_date,
            logo_reference: self.logo_reference,
        })
    }
}

pub async fn update_subscription(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedOwner>,
    Path(subscription_id): Path<String>,
    Json(body): Json<UpdateSubscriptionRequest>,
) -> Result<ApiSuccess<SubscriptionData>, ApiError> {
    let subscription_id =
        SubscriptionId::from_string(&subscription_id).map_err(SubscriptionError::from)?;
    let command = body.try_into_command()?;

    state
        .subscription_service
        .update(&subscription_id, &caller.owner_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref subscription| ApiSuccess::new(StatusCode::OK, subscription.into()))
}

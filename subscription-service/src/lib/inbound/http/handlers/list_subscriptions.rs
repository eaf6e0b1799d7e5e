use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::NaiveDate;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SubscriptionData;
use crate::domain::subscription::models::ListQuery;
use crate::domain::subscription::models::SortOrder;
use crate::domain::subscription::ports::SubscriptionServicePort;
use crate::inbound::http::middleware::AuthenticatedOwner;
use crate::inbound::http::router::AppState;
use crate::subscription::errors::SubscriptionError;

/// Query string of the list endpoint. Dates are `YYYY-MM-DD`, both bounds inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSubscriptionsParams {
    start_date_from: Option<NaiveDate>,
    start_date_to: Option<NaiveDate>,
    sort: Option<String>,
}

impl ListSubscriptionsParams {
    fn try_into_query(self) -> Result<ListQuery, SubscriptionError> {
        let sort = self
            .sort
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()?;

        Ok(ListQuery::new(self.start_date_from, self.start_date_to, sort)?)
    }
}

pub async fn list_subscriptions(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedOwner>,
    Query(params): Query<ListSubscriptionsParams>,
) -> Result<ApiSuccess<Vec<SubscriptionData>>, ApiError> {
    let query = params.try_into_query()?;

    state
        .subscription_service
        .list(&caller.owner_id, query)
        .await
        .map_err(ApiError::from)
        .map(|subscriptions| {
            let data: Vec<SubscriptionData> = subscriptions.iter().map(|s| s.into()).collect();
            ApiSuccess::new(StatusCode::OK, data)
        })
}

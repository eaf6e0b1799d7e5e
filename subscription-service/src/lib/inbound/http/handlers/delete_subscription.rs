use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::subscription::models::SubscriptionId;
use crate::domain::subscription::ports::SubscriptionServicePort;
use crate::inbound::http::middleware::AuthenticatedOwner;
use crate::inbound::http::router::AppState;
use crate::subscription::errors::SubscriptionError;

pub async fn delete_subscription(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedOwner>,
    Path(subscription_id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let subscription_id =
        SubscriptionId::from_string(&subscription_id).map_err(SubscriptionError::from)?;

    state
        .subscription_service
        .delete(&subscription_id, &caller.owner_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}

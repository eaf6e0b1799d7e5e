use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::AuthError;

pub async fn initiate_passwordless(
    State(state): State<AppState>,
    Json(body): Json<InitiatePasswordlessRequest>,
) -> Result<ApiSuccess<InitiatePasswordlessResponseData>, ApiError> {
    let email = EmailAddress::new(body.email).map_err(AuthError::from)?;

    state
        .auth_service
        .initiate_passwordless_login(&email)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                InitiatePasswordlessResponseData {
                    message: "Login link sent".to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InitiatePasswordlessRequest {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitiatePasswordlessResponseData {
    pub message: String,
}

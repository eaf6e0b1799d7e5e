use auth::TokenPurpose;
use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::subscription::models::OwnerId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type carrying the caller, who owns everything they touch
#[derive(Debug, Clone)]
pub struct AuthenticatedOwner {
    pub owner_id: OwnerId,
}

/// Middleware that accepts only session tokens issued by the user service
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state
        .authenticator
        .validate_token(token, TokenPurpose::Session)
        .map_err(|e| {
            tracing::warn!(error = %e, "JWT validation failed");
            unauthorized("Invalid or expired token")
        })?;

    let owner_id = OwnerId::from_string(&claims.sub).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse owner ID from token");
        unauthorized("Invalid token format")
    })?;

    req.extensions_mut().insert(AuthenticatedOwner { owner_id });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization header format. Expected: Bearer <token>"))
}

fn unauthorized(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}

use axum::extract::Query;
use axum::extract::State;
use axum::response::Redirect;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::spotify_login::OAUTH_STATE_COOKIE;
use super::ApiError;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Complete a Spotify login and hand the session token to the frontend.
///
/// The state cookie is cleared whatever the outcome.
pub async fn spotify_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<SpotifyCallbackParams>,
) -> (CookieJar, Result<Redirect, ApiError>) {
    let saved_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path("/"));

    if let Some(error) = &params.error {
        tracing::warn!(error = %error, "Provider reported an authorization error");
    }

    let result = state
        .auth_service
        .handle_spotify_callback(
            params.code.as_deref().unwrap_or_default(),
            params.state.as_deref().unwrap_or_default(),
            saved_state.as_deref(),
        )
        .await
        .map_err(ApiError::from)
        .map(|session| {
            Redirect::temporary(&format!(
                "{}?token={}",
                state.frontend_callback_url, session.token
            ))
        });

    (jar, result)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyCallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

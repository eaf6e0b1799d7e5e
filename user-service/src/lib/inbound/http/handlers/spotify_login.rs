use axum::extract::State;
use axum::response::Redirect;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;

use super::ApiError;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Start a Spotify login: remember the handshake state in a cookie and
/// send the browser to the provider.
pub async fn spotify_login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let redirect = state.auth_service.begin_spotify_login().await?;

    // Session cookie; the server-side state record carries the expiry.
    let cookie = Cookie::build((OAUTH_STATE_COOKIE, redirect.state))
        .path("/")
        .http_only(true)
        .secure(state.secure_cookies)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Redirect::temporary(&redirect.url)))
}

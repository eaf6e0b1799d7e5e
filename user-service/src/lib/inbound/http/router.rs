use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::delete_me::delete_me;
use super::handlers::get_me::get_me;
use super::handlers::initiate_passwordless::initiate_passwordless;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::spotify_callback::spotify_callback;
use super::handlers::spotify_login::spotify_login;
use super::handlers::update_me::update_me;
use super::handlers::verify_passwordless::verify_passwordless;
use super::middleware::authenticate as auth_middleware;
use crate::domain::user::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub frontend_callback_url: String,
    pub secure_cookies: bool,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    authenticator: Arc<Authenticator>,
    frontend_callback_url: String,
    secure_cookies: bool,
) -> Router {
    let state = AppState {
        auth_service,
        authenticator,
        frontend_callback_url,
        secure_cookies,
    };

    let public_routes = Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/passwordless/initiate", post(initiate_passwordless))
        .route("/api/passwordless/verify", post(verify_passwordless))
        .route("/api/auth/spotify", get(spotify_login))
        .route("/api/spotify-callback", get(spotify_callback));

    let protected_routes = Router::new()
        .route("/api/me", get(get_me).put(update_me).delete(delete_me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

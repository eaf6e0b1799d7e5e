use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_subscription::create_subscription;
use super::handlers::delete_subscription::delete_subscription;
use super::handlers::get_provider_config::get_provider_config;
use super::handlers::get_subscription::get_subscription;
use super::handlers::list_provider_configs::list_provider_configs;
use super::handlers::list_subscriptions::list_subscriptions;
use super::handlers::update_subscription::update_subscription;
use super::middleware::authenticate as auth_middleware;
use crate::domain::catalog::ports::CatalogServicePort;
use crate::domain::subscription::ports::SubscriptionServicePort;

#[derive(Clone)]
pub struct AppState {
    pub subscription_service: Arc<dyn SubscriptionServicePort>,
    pub catalog_service: Arc<dyn CatalogServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    subscription_service: Arc<dyn SubscriptionServicePort>,
    catalog_service: Arc<dyn CatalogServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        subscription_service,
        catalog_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/api/subscriptions_configs", get(list_provider_configs))
        .route(
            "/api/subscriptions_configs/:provider",
            get(get_provider_config),
        );

    let protected_routes = Router::new()
        .route(
            "/api/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route(
            "/api/subscriptions/:subscription_id",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
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

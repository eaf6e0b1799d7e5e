use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::ProviderConfigData;
use crate::domain::catalog::ports::CatalogServicePort;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProviderConfigsParams {
    #[serde(default)]
    active_only: bool,
}

/// Public provider catalog, with `?active_only=true` limiting it to what is on offer.
pub async fn list_provider_configs(
    State(state): State<AppState>,
    Query(params): Query<ListProviderConfigsParams>,
) -> Result<ApiSuccess<Vec<ProviderConfigData>>, ApiError> {
    state
        .catalog_service
        .list_configs(params.active_only)
        .await
        .map_err(ApiError::from)
        .map(|configs| {
            let data: Vec<ProviderConfigData> = configs.iter().map(|c| c.into()).collect();
            ApiSuccess::new(StatusCode::OK, data)
        })
}

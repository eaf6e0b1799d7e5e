use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::ProviderConfigData;
use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::models::ProviderName;
use crate::domain::catalog::ports::CatalogServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_provider_config(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<ApiSuccess<ProviderConfigData>, ApiError> {
    let provider = ProviderName::new(provider).map_err(CatalogError::from)?;

    state
        .catalog_service
        .get_config(&provider)
        .await
        .map_err(ApiError::from)
        .map(|ref config| ApiSuccess::new(StatusCode::OK, config.into()))
}

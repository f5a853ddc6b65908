//! REST API route definitions

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::get,
    Router,
};
use footlight_core::{DeviceConfig, Preset};

use super::handlers::{ApiError, ApiResponse, ConfigDto, PresetDto, StatusResponse};
use super::server::AppState;

/// Build the API router
pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/presets", get(get_presets).post(post_presets))
        .route("/api/config", get(get_config).post(post_config))
}

/// GET /api/status - Controller status
async fn get_status(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatusResponse>>, ApiError> {
    let status = state.control.status().await?;
    Ok(Json(ApiResponse::success(StatusResponse {
        version: footlight_core::VERSION.to_string(),
        num_presets: status.num_presets,
        current_index: status.current_index,
    })))
}

/// GET /api/presets - The active presets
async fn get_presets(State(state): State<AppState>) -> Result<Json<Vec<PresetDto>>, ApiError> {
    let presets = state.control.presets().await?;
    Ok(Json(presets.iter().map(PresetDto::from).collect()))
}

/// POST /api/presets - Replace and persist all presets
async fn post_presets(
    State(state): State<AppState>,
    payload: Result<Json<Vec<PresetDto>>, JsonRejection>,
) -> Result<Json<ApiResponse<usize>>, ApiError> {
    let Json(presets) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let count = presets.len();

    let presets: Vec<Preset> = presets.into_iter().map(Preset::from).collect();
    state.control.replace_presets(presets).await?;

    tracing::info!("Loaded {} presets from JSON", count);
    Ok(Json(ApiResponse::success(count)))
}

/// GET /api/config - Stored device configuration
async fn get_config(State(state): State<AppState>) -> Result<Json<ConfigDto>, ApiError> {
    let config = state.control.config().await?;
    Ok(Json(ConfigDto::from(config)))
}

/// POST /api/config - Store device configuration (applies at next boot)
async fn post_config(
    State(state): State<AppState>,
    payload: Result<Json<ConfigDto>, JsonRejection>,
) -> Result<Json<ApiResponse<ConfigDto>>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    if let Err(msg) = request.validate() {
        return Err(ApiError::bad_request(msg));
    }

    state.control.set_config(DeviceConfig::from(request)).await?;

    tracing::info!("Configuration updated from JSON");
    Ok(Json(ApiResponse::success(request)))
}

use crate::{
    config::{AppConfig, RuntimeEnvironment},
    db::BackendMode,
    errors::ServiceError,
    handlers::AppState,
};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub environment: RuntimeEnvironment,
    pub backend: BackendMode,
    pub mock_data: bool,
    pub timestamp: String,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "up",
        version: state.config.app_version.clone(),
        environment: state.config.environment,
        backend: state.data.backend_mode(),
        mock_data: state.data.mock_enabled(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Non-secret configuration plus the derived environment flags.
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    #[serde(flatten)]
    pub config: AppConfig,
    pub is_production: bool,
    pub is_qa: bool,
    pub is_development: bool,
    pub backend_configured: bool,
}

async fn config_report(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConfigReport>, ServiceError> {
    let config = state.config.as_ref();
    if config.is_production() {
        return Err(ServiceError::Forbidden(
            "configuration is not available in production".into(),
        ));
    }
    Ok(Json(ConfigReport {
        config: config.clone(),
        is_production: config.is_production(),
        is_qa: config.is_qa(),
        is_development: config.is_development(),
        backend_configured: config.backend_credentials().is_some(),
    }))
}

pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/config", get(config_report))
}

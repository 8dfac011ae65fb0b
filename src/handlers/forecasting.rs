use crate::{
    errors::ServiceError,
    handlers::AppState,
    services::{HistoricalAnalysis, LaneForecast, UploadKind, UploadReceipt},
};
use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::warn;

async fn lane_forecast(
    State(state): State<Arc<AppState>>,
    Path(lane_id): Path<String>,
) -> Result<Json<LaneForecast>, ServiceError> {
    Ok(Json(state.forecasts.lane_forecast(&lane_id).await?))
}

async fn historical_analysis(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistoricalAnalysis>, ServiceError> {
    Ok(Json(state.forecasts.historical_analysis().await?))
}

/// Forwards the `file` field of a multipart body.
async fn upload(
    State(state): State<Arc<AppState>>,
    Path(file_type): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadReceipt>, ServiceError> {
    let kind: UploadKind = file_type.parse().map_err(|_| {
        ServiceError::InvalidInput(format!(
            "unknown upload type '{}', expected bid, historical or market",
            file_type
        ))
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::InvalidInput(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            warn!("Ignoring multipart field {:?}", field.name());
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ServiceError::InvalidInput(format!("unreadable upload: {}", e)))?;
        let receipt = state.forecasts.upload(kind, &filename, content).await?;
        return Ok(Json(receipt));
    }

    Err(ServiceError::InvalidInput("multipart field 'file' is missing".into()))
}

pub fn forecasting_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/forecast/:lane_id", get(lane_forecast))
        .route("/historical-analysis", get(historical_analysis))
        .route("/upload/:file_type", post(upload))
}

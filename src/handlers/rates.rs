use super::common::{created_envelope, envelope};
use crate::{
    handlers::AppState,
    models::{NewForecast, NewRate, RateUpdate},
};
use axum::{
    extract::{Json, Path, State},
    response::Response,
    routing::{patch, post},
    Router,
};
use std::sync::Arc;

async fn add_rate(State(state): State<Arc<AppState>>, Json(input): Json<NewRate>) -> Response {
    created_envelope(state.data.add_rate(input).await)
}

async fn update_rate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(updates): Json<RateUpdate>,
) -> Response {
    envelope(state.data.update_rate(&id, updates).await)
}

async fn add_forecast(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewForecast>,
) -> Response {
    created_envelope(state.data.add_forecast(input).await)
}

pub fn rate_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rates", post(add_rate))
        .route("/rates/:id", patch(update_rate))
        .route("/forecasts", post(add_forecast))
}

use super::common::{created_envelope, envelope, TagLinkRequest};
use crate::{
    handlers::AppState,
    models::{LaneUpdate, NewLane},
};
use axum::{
    extract::{Json, Path, State},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

async fn create_lane(State(state): State<Arc<AppState>>, Json(input): Json<NewLane>) -> Response {
    created_envelope(state.data.create_lane(input).await)
}

async fn get_lane(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    envelope(state.data.get_lane_by_id(&id).await)
}

async fn update_lane(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(updates): Json<LaneUpdate>,
) -> Response {
    envelope(state.data.update_lane(&id, updates).await)
}

async fn delete_lane(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    envelope(state.data.delete_lane(&id).await)
}

async fn lane_rates(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    envelope(state.data.get_rates_by_lane(&id).await)
}

async fn lane_forecasts(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    envelope(state.data.get_forecasts_by_lane(&id).await)
}

async fn tag_lane(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<TagLinkRequest>,
) -> Response {
    created_envelope(state.data.add_tag_to_lane(&id, &body.tag_id).await)
}

pub fn lane_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_lane))
        .route("/:id", get(get_lane).patch(update_lane).delete(delete_lane))
        .route("/:id/rates", get(lane_rates))
        .route("/:id/forecasts", get(lane_forecasts))
        .route("/:id/tags", post(tag_lane))
}

//! Reference data: locations, equipment, market series and tags.

use super::common::{created_envelope, envelope, LimitParams};
use crate::{
    handlers::AppState,
    models::{NewLocation, NewTag},
    services::DEFAULT_MARKET_LIMIT,
};
use axum::{
    extract::{Json, Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LocationSearch {
    #[serde(default)]
    pub q: String,
}

async fn search_locations(
    State(state): State<Arc<AppState>>,
    Query(search): Query<LocationSearch>,
) -> Response {
    envelope(state.data.search_locations(&search.q).await)
}

async fn create_location(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewLocation>,
) -> Response {
    created_envelope(state.data.create_location(input).await)
}

async fn equipment_types(State(state): State<Arc<AppState>>) -> Response {
    envelope(state.data.get_all_equipment_types().await)
}

async fn market_indices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Response {
    let limit = params.limit.unwrap_or(DEFAULT_MARKET_LIMIT);
    envelope(state.data.get_recent_market_indices(limit).await)
}

async fn fuel_prices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Response {
    let limit = params.limit.unwrap_or(DEFAULT_MARKET_LIMIT);
    envelope(state.data.get_recent_fuel_prices(limit).await)
}

async fn list_tags(State(state): State<Arc<AppState>>) -> Response {
    envelope(state.data.get_all_tags().await)
}

async fn create_tag(State(state): State<Arc<AppState>>, Json(input): Json<NewTag>) -> Response {
    created_envelope(state.data.create_tag(input).await)
}

pub fn reference_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/locations", get(search_locations).post(create_location))
        .route("/equipment-types", get(equipment_types))
        .route("/market-indices", get(market_indices))
        .route("/fuel-prices", get(fuel_prices))
        .route("/tags", get(list_tags).post(create_tag))
}

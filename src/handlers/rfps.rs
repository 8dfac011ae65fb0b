use super::common::{created_envelope, envelope, TagLinkRequest};
use crate::{
    errors::ServiceError,
    handlers::AppState,
    models::{NewRfp, RfpUpdate},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct RfpListParams {
    pub company_id: Option<String>,
}

async fn list_rfps(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RfpListParams>,
) -> Response {
    let Some(company_id) = params.company_id.filter(|id| !id.is_empty()) else {
        return envelope::<()>(Err(ServiceError::InvalidInput(
            "company_id query parameter is required".into(),
        )));
    };
    envelope(state.data.get_rfps(&company_id).await)
}

async fn create_rfp(State(state): State<Arc<AppState>>, Json(input): Json<NewRfp>) -> Response {
    let result = state.data.create_rfp(input).await;
    if let Ok(rfp) = &result {
        info!(rfp_id = %rfp.id, "RFP created");
    }
    created_envelope(result)
}

async fn get_rfp(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    envelope(state.data.get_rfp_by_id(&id).await)
}

async fn update_rfp(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(updates): Json<RfpUpdate>,
) -> Response {
    envelope(state.data.update_rfp(&id, updates).await)
}

async fn delete_rfp(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let result = state.data.delete_rfp(&id).await;
    if result.is_ok() {
        info!(rfp_id = %id, "RFP deleted");
    }
    envelope(result)
}

async fn list_rfp_lanes(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    envelope(state.data.get_lanes_by_rfp(&id).await)
}

async fn tag_rfp(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<TagLinkRequest>,
) -> Response {
    created_envelope(state.data.add_tag_to_rfp(&id, &body.tag_id).await)
}

pub fn rfp_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_rfps).post(create_rfp))
        .route("/:id", get(get_rfp).patch(update_rfp).delete(delete_rfp))
        .route("/:id/lanes", get(list_rfp_lanes))
        .route("/:id/tags", post(tag_rfp))
}

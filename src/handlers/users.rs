use super::common::envelope;
use crate::{handlers::AppState, models::UserUpdate};
use axum::{
    extract::{Json, Path, State},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

async fn current_user(State(state): State<Arc<AppState>>) -> Response {
    envelope(state.data.get_current_user().await)
}

async fn sign_out(State(state): State<Arc<AppState>>) -> Response {
    envelope(state.data.sign_out().await)
}

async fn get_profile(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    envelope(state.data.get_user_profile(&id).await)
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(updates): Json<UserUpdate>,
) -> Response {
    envelope(state.data.update_user_profile(&id, updates).await)
}

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/user", get(current_user))
        .route("/auth/sign-out", post(sign_out))
        .route("/users/:id", get(get_profile).patch(update_profile))
}

pub mod common;
pub mod forecasting;
pub mod health;
pub mod lanes;
pub mod rates;
pub mod reference;
pub mod rfps;
pub mod users;

use axum::Router;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Data endpoints, mounted under `/api/v1`.
pub fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/rfps", rfps::rfp_routes())
        .nest("/lanes", lanes::lane_routes())
        .merge(rates::rate_routes())
        .merge(reference::reference_routes())
        .merge(users::user_routes())
}

/// Forecasting proxy, mounted under `/api`.
pub fn forecasting_routes() -> Router<Arc<AppState>> {
    forecasting::forecasting_routes()
}

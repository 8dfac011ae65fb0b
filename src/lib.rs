//! Lane Zen library
//!
//! Data access for freight RFPs, lanes, rates and forecasts over a hosted
//! PostgREST backend, with a fixture-backed mock mode, plus a client for the
//! external forecasting API and the HTTP surface that exposes both.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod mock_data;
pub mod models;
pub mod services;

use axum::Router;
use http::{HeaderValue, Method};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::services::{DataAccess, ForecastApiClient};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub data: DataAccess,
    pub forecasts: ForecastApiClient,
}

impl AppState {
    /// Builds the state from a resolved configuration: backend handle, mock
    /// store and forecasting client.
    pub fn from_config(config: AppConfig) -> Result<Self, errors::ServiceError> {
        let backend = db::connect(&config);
        let data = DataAccess::from_config(&config, backend);
        let forecasts = ForecastApiClient::new(&config.api_url, config.api_timeout())?;
        Ok(Self {
            config: Arc::new(config),
            data,
            forecasts,
        })
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.is_production() {
        return CorsLayer::permissive();
    }
    let origin = format!("http://{}:{}", config.host, config.port);
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);
    match HeaderValue::from_str(&origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => layer,
    }
}

/// The full application router.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .merge(handlers::health::health_routes())
        .nest("/api/v1", handlers::api_v1_routes())
        .nest("/api", handlers::forecasting_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

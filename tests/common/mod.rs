#![allow(dead_code)]

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use lane_zen::{
    config::{AppConfig, RawSettings},
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

/// Raw settings with mock data switched on and nothing else set.
pub fn mock_settings() -> RawSettings {
    RawSettings {
        use_mock_data: Some("true".to_string()),
        ..Default::default()
    }
}

/// Raw settings pointing the live backend and forecasting API at `base`.
pub fn live_settings(base: &str) -> RawSettings {
    RawSettings {
        supabase_url: Some(base.to_string()),
        supabase_anon_key: Some("test-anon-key".to_string()),
        api_url: Some(base.to_string()),
        api_timeout: Some("2000".to_string()),
        ..Default::default()
    }
}

/// Router plus state, driven in-process with `oneshot`.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new(settings: RawSettings) -> Self {
        let config = AppConfig::resolve(settings);
        let state = AppState::from_config(config).expect("failed to build test state");
        let router = lane_zen::app(state.clone());
        Self { router, state }
    }

    pub fn mock() -> Self {
        Self::new(mock_settings())
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}

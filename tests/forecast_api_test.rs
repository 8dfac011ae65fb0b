mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use bytes::Bytes;
use common::{live_settings, response_json, TestApp};
use lane_zen::{
    errors::ServiceError,
    services::{ForecastApiClient, UploadKind},
};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn series(start: f64) -> serde_json::Value {
    json!({
        "dates": ["2024-01-31", "2024-02-29", "2024-03-31"],
        "values": [start, start + 10.0, start + 20.0]
    })
}

fn client(server: &MockServer) -> ForecastApiClient {
    ForecastApiClient::new(&server.uri(), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn lane_forecast_returns_three_models() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/forecast/LAX-NYC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sarimax": series(3500.0),
            "xgboost": series(3490.0),
            "neural_prophet": series(3510.0)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let forecast = client(&server).lane_forecast("LAX-NYC").await.unwrap();
    assert_eq!(forecast.sarimax.values.len(), 3);
    assert_eq!(forecast.neural_prophet.values[0], 3510.0);
}

#[tokio::test]
async fn error_body_with_ok_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/historical-analysis"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "No historical data found" })),
        )
        .mount(&server)
        .await;

    let err = client(&server).historical_analysis().await.unwrap_err();
    assert_matches!(err, ServiceError::ExternalApiError(msg) if msg == "No historical data found");
}

#[tokio::test]
async fn historical_analysis_parses_trends() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/historical-analysis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_lanes": 42,
            "average_rate": 2875.5,
            "monthly_trends": { "1": 2800.0, "2": 2950.0 }
        })))
        .mount(&server)
        .await;

    let analysis = client(&server).historical_analysis().await.unwrap();
    assert_eq!(analysis.total_lanes, 42);
    assert_eq!(analysis.monthly_trends.get("2"), Some(&2950.0));
}

#[tokio::test]
async fn upload_sends_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload/historical"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("lane_id,date,rate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "filename": "history.csv", "status": "success" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client(&server)
        .upload(
            UploadKind::Historical,
            "history.csv",
            Bytes::from_static(b"lane_id,date,rate\nL1,2023-01-31,3500\n"),
        )
        .await
        .unwrap();
    assert_eq!(receipt.status, "success");
}

#[tokio::test]
async fn proxy_route_forwards_forecast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/forecast/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sarimax": series(1.0),
            "xgboost": series(2.0),
            "neural_prophet": series(3.0)
        })))
        .mount(&server)
        .await;

    let app = TestApp::new(live_settings(&server.uri()));
    let response = app.get("/api/forecast/7").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["xgboost"]["values"][0], 2.0);
}

#[tokio::test]
async fn proxy_route_maps_reported_error_to_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/forecast/8"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "error": "No data found for the specified lane" })),
        )
        .mount(&server)
        .await;

    let app = TestApp::new(live_settings(&server.uri()));
    let response = app.get("/api/forecast/8").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("No data found for the specified lane"));
}

#[tokio::test]
async fn unknown_upload_type_is_bad_request() {
    let app = TestApp::mock();
    let response = app
        .request(axum::http::Method::POST, "/api/upload/invoices", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

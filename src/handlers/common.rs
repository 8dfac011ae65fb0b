use crate::errors::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// `{ "data": ..., "error": ... }` body used by the data endpoints.
///
/// `error` is non-null exactly when the call failed. Operations with no
/// result (deletes, sign-out) succeed as `{ "data": null, "error": null }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<()> {
    pub fn error(err: &ServiceError) -> Self {
        Self {
            data: None,
            error: Some(err.response_message()),
        }
    }
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(data) => (status, Json(Envelope::data(data))).into_response(),
        Err(err) => (err.status_code(), Json(Envelope::error(&err))).into_response(),
    }
}

/// Standard envelope response
pub fn envelope<T: Serialize>(result: Result<T, ServiceError>) -> Response {
    respond(StatusCode::OK, result)
}

/// Envelope response with 201 on success
pub fn created_envelope<T: Serialize>(result: Result<T, ServiceError>) -> Response {
    respond(StatusCode::CREATED, result)
}

/// Body of the tag-link endpoints.
#[derive(Debug, Deserialize)]
pub struct TagLinkRequest {
    pub tag_id: String,
}

/// `?limit=` for market reads.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_reports_data_or_error() {
        let ok = serde_json::to_value(Envelope::data(vec![1, 2])).unwrap();
        assert_eq!(ok, json!({ "data": [1, 2], "error": null }));

        let err = serde_json::to_value(Envelope::error(&ServiceError::NotFound(
            "RFP not found".into(),
        )))
        .unwrap();
        assert_eq!(err, json!({ "data": null, "error": "Not found: RFP not found" }));
    }

    #[test]
    fn unit_success_has_neither_data_nor_error() {
        let done = serde_json::to_value(Envelope::data(())).unwrap();
        assert_eq!(done, json!({ "data": null, "error": null }));
    }

    #[test]
    fn error_status_follows_service_error() {
        let response = envelope::<()>(Err(ServiceError::InvalidInput("bad".into())));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = created_envelope(Ok("x"));
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

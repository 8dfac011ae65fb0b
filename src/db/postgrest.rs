use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::{BackendClient, BackendMode, Query};
use crate::errors::{BackendError, ServiceError};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// REST client for a PostgREST backend with anon-key authentication.
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    client: reqwest::Client,
    base: Url,
}

impl PostgrestClient {
    pub fn new(url: &str, anon_key: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let base = Url::parse(url)
            .map_err(|e| ServiceError::Config(format!("invalid backend URL '{}': {}", url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ServiceError::Config(format!(
                "backend URL '{}' cannot be a base",
                url
            )));
        }

        let invalid_key = |_| ServiceError::Config("anon key is not a valid header value".into());
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(anon_key).map_err(invalid_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", anon_key)).map_err(invalid_key)?,
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Config("backend URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn table_request(&self, method: Method, query: &Query) -> Result<RequestBuilder, ServiceError> {
        let url = self.endpoint(&["rest", "v1", query.table_name()])?;
        let mut request = self.client.request(method, url).query(&query.params());
        if query.is_single() {
            request = request.header(ACCEPT, SINGLE_OBJECT);
        }
        Ok(request)
    }

    async fn execute(request: RequestBuilder) -> Result<Value, ServiceError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(backend_error(status, &body).into());
        }
        if body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Error object from a failed response, falling back to the status line when
/// the body is not PostgREST-shaped.
fn backend_error(status: StatusCode, body: &[u8]) -> BackendError {
    let mut err = serde_json::from_slice::<BackendError>(body)
        .unwrap_or_else(|_| BackendError::new(String::from_utf8_lossy(body)));
    if err.message.trim().is_empty() {
        err.message = status.to_string();
    }
    if err.code.is_none() {
        err.code = Some(status.as_u16().to_string());
    }
    err
}

#[async_trait]
impl BackendClient for PostgrestClient {
    fn mode(&self) -> BackendMode {
        BackendMode::Live
    }

    #[instrument(skip(self))]
    async fn select(&self, query: Query) -> Result<Value, ServiceError> {
        Self::execute(self.table_request(Method::GET, &query)?).await
    }

    #[instrument(skip(self, row))]
    async fn insert(&self, query: Query, row: Value) -> Result<Value, ServiceError> {
        let request = self
            .table_request(Method::POST, &query)?
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&row);
        Self::execute(request).await
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, query: Query, changes: Value) -> Result<Value, ServiceError> {
        let request = self
            .table_request(Method::PATCH, &query)?
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&changes);
        Self::execute(request).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, query: Query) -> Result<Value, ServiceError> {
        Self::execute(self.table_request(Method::DELETE, &query)?).await
    }

    async fn current_user(&self) -> Result<Value, ServiceError> {
        let url = self.endpoint(&["auth", "v1", "user"])?;
        let response = self.client.get(url).send().await?;
        let status = response.status();

        // The anon key alone carries no session.
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!("No authenticated session ({})", status);
            return Ok(json!({ "user": null }));
        }

        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(backend_error(status, &body).into());
        }
        let user: Value = serde_json::from_slice(&body)?;
        Ok(json!({ "user": user }))
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        let url = self.endpoint(&["auth", "v1", "logout"])?;
        Self::execute(self.client.post(url)).await.map(|_| ())
    }
}

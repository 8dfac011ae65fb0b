//! Data-access layer.
//!
//! [`DataAccess`] exposes one async method per logical operation. Each method
//! first checks whether mock mode can answer it from fixtures; if not, it calls
//! the shared backend handle and decodes the JSON payload. Either way the
//! caller gets a plain `Result`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

use crate::app_log;
use crate::config::AppConfig;
use crate::db::{BackendMode, SharedBackend};
use crate::errors::ServiceError;
use crate::logging::{AppLogger, LogLevel};
use crate::mock_data::MockStore;

pub mod forecasting;
pub mod lanes;
pub mod locations;
pub mod market;
pub mod rates;
pub mod rfps;
pub mod tags;
pub mod users;

pub use forecasting::{
    ForecastApiClient, HistoricalAnalysis, LaneForecast, ModelSeries, MonthlyTrend,
    UploadKind, UploadReceipt,
};

/// Default row count for market-data reads.
pub const DEFAULT_MARKET_LIMIT: usize = 10;

/// Maximum number of location search hits.
pub const LOCATION_SEARCH_LIMIT: usize = 10;

#[derive(Clone)]
pub struct DataAccess {
    backend: SharedBackend,
    mock: MockStore,
    logger: AppLogger,
}

impl DataAccess {
    pub fn new(backend: SharedBackend, mock: MockStore, logger: AppLogger) -> Self {
        Self {
            backend,
            mock,
            logger,
        }
    }

    /// Wires the mock store and logger from `config` around `backend`.
    pub fn from_config(config: &AppConfig, backend: SharedBackend) -> Self {
        let logger = config.logger();
        let mock = MockStore::new(config.use_mock_data, logger.clone());
        Self::new(backend, mock, logger)
    }

    pub fn mock_enabled(&self) -> bool {
        self.mock.is_enabled()
    }

    pub fn backend_mode(&self) -> BackendMode {
        self.backend.mode()
    }

    /// Mock-mode answer for an operation, if mock mode is on and `build`
    /// produces one.
    fn short_circuit<T>(&self, build: impl FnOnce(&MockStore) -> Option<T>) -> Option<T> {
        if !self.mock.is_enabled() {
            return None;
        }
        build(&self.mock)
    }

    /// Runs a live backend operation, logging any failure before returning it.
    async fn run<T, F>(&self, operation: &str, call: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        match call.await {
            Ok(value) => Ok(value),
            Err(err) if err.is_backend_reported() => {
                app_log!(
                    self.logger,
                    LogLevel::Error,
                    "Database operation failed ({}): {}",
                    operation,
                    err
                );
                Err(err)
            }
            Err(err) => {
                app_log!(
                    self.logger,
                    LogLevel::Error,
                    "Unexpected error during database operation ({}): {}",
                    operation,
                    err
                );
                Err(err)
            }
        }
    }
}

/// Rows from a list response. `null` counts as no rows.
fn decode_many<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ServiceError> {
    match value {
        Value::Null => Ok(Vec::new()),
        other => Ok(serde_json::from_value(other)?),
    }
}

/// One row from a single-row response, which may also arrive as a one-element
/// array.
fn decode_single<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ServiceError> {
    let row = match value {
        Value::Null => None,
        Value::Array(rows) => rows.into_iter().next(),
        other => Some(other),
    };
    match row {
        Some(row) => Ok(serde_json::from_value(row)?),
        None => Err(ServiceError::NotFound(format!("{} not found", what))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeEnvironment;
    use crate::db::MockBackendClient;
    use crate::errors::BackendError;
    use crate::models::{NewTag, Rfp, Tag};
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::sync::Arc;

    fn logger() -> AppLogger {
        AppLogger::new(RuntimeEnvironment::Development, LogLevel::Debug)
    }

    fn data(backend: MockBackendClient, mock_enabled: bool) -> DataAccess {
        DataAccess::new(
            Arc::new(backend),
            MockStore::new(mock_enabled, logger()),
            logger(),
        )
    }

    #[tokio::test]
    async fn mock_mode_never_touches_backend() {
        let mut backend = MockBackendClient::new();
        backend.expect_select().never();
        backend.expect_insert().never();
        let data = data(backend, true);

        let rfps = data.get_rfps("1").await.unwrap();
        assert_eq!(rfps.len(), 2);

        let tag = data
            .create_tag(NewTag {
                name: "Backhaul".into(),
                color: "purple".into(),
            })
            .await
            .unwrap();
        assert!(tag.id.starts_with("mock-"));
    }

    #[tokio::test]
    async fn live_mode_decodes_backend_rows() {
        let mut backend = MockBackendClient::new();
        backend
            .expect_select()
            .withf(|query| query.table_name() == "tags")
            .times(1)
            .returning(|_| Ok(json!([{ "id": "7", "name": "Intermodal", "color": "teal" }])));
        let data = data(backend, false);

        let tags: Vec<Tag> = data.get_all_tags().await.unwrap();
        assert_eq!(tags[0].name, "Intermodal");
    }

    #[tokio::test]
    async fn backend_reported_error_is_returned() {
        let mut backend = MockBackendClient::new();
        backend
            .expect_select()
            .returning(|_| Err(BackendError::new("permission denied for table rfps").into()));
        let data = data(backend, false);

        assert_matches!(data.get_rfps("1").await, Err(ServiceError::Backend(_)));
    }

    #[tokio::test]
    async fn transport_error_uses_same_channel() {
        let mut backend = MockBackendClient::new();
        backend
            .expect_select()
            .returning(|_| Err(ServiceError::Transport("connection refused".into())));
        let data = data(backend, false);

        assert_matches!(data.get_rfp_by_id("1").await, Err(ServiceError::Transport(_)));
    }

    #[tokio::test]
    async fn mock_miss_falls_through_to_backend() {
        let mut backend = MockBackendClient::new();
        backend
            .expect_select()
            .times(1)
            .returning(|_| Ok(json!({ "id": "9", "email": "new@example.com", "name": "New",
                "company_id": "2", "role": "user", "created_at": "2023-05-01T00:00:00Z" })));
        let data = data(backend, true);

        let user = data.get_user_profile("9").await.unwrap();
        assert_eq!(user.email, "new@example.com");
    }

    #[test]
    fn decode_single_handles_empty_and_wrapped_rows() {
        assert_matches!(
            decode_single::<Tag>(Value::Null, "tag"),
            Err(ServiceError::NotFound(_))
        );
        assert_matches!(
            decode_single::<Tag>(json!([]), "tag"),
            Err(ServiceError::NotFound(_))
        );
        let tag: Tag =
            decode_single(json!([{ "id": "1", "name": "a", "color": "b" }]), "tag").unwrap();
        assert_eq!(tag.id, "1");
        assert!(decode_many::<Rfp>(Value::Null).unwrap().is_empty());
    }
}

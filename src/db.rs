pub mod postgrest;
pub mod query;
pub mod stub;

use crate::app_log;
use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::logging::LogLevel;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use strum::{AsRefStr, Display};

pub use postgrest::PostgrestClient;
pub use query::{Direction, Query};
pub use stub::StubClient;

/// Which backend implementation is serving requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BackendMode {
    Live,
    Stub,
}

/// Operations the data-access layer needs from the hosted backend.
///
/// Payloads are raw JSON; decoding into domain types happens in the
/// services.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendClient: Send + Sync {
    fn mode(&self) -> BackendMode;

    /// Rows matching `query`, or a single object when the query is single.
    async fn select(&self, query: Query) -> Result<Value, ServiceError>;

    /// Inserts `row` into the query's table and returns the stored representation.
    async fn insert(&self, query: Query, row: Value) -> Result<Value, ServiceError>;

    /// Applies `changes` to the rows matched by `query`.
    async fn update(&self, query: Query, changes: Value) -> Result<Value, ServiceError>;

    async fn delete(&self, query: Query) -> Result<Value, ServiceError>;

    /// The authenticated session, shaped `{"user": ...}`.
    async fn current_user(&self) -> Result<Value, ServiceError>;

    async fn sign_out(&self) -> Result<(), ServiceError>;
}

/// Shared handle to the backend, built once at startup.
pub type SharedBackend = Arc<dyn BackendClient>;

/// Builds the backend handle for `config`.
///
/// Never fails: missing credentials or a client that cannot be constructed
/// both yield the stub.
pub fn connect(config: &AppConfig) -> SharedBackend {
    let logger = config.logger();
    let Some((url, key)) = config.backend_credentials() else {
        app_log!(
            logger,
            LogLevel::Warn,
            "Backend credentials missing, using stub client"
        );
        return Arc::new(StubClient::new(logger));
    };

    match PostgrestClient::new(url, key, config.api_timeout()) {
        Ok(client) => {
            app_log!(logger, LogLevel::Info, "Connected backend client for {}", url);
            Arc::new(client)
        }
        Err(err) => {
            app_log!(
                logger,
                LogLevel::Error,
                "Failed to initialize backend client: {}",
                err
            );
            Arc::new(StubClient::new(logger))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawSettings;

    fn config(url: Option<&str>, key: Option<&str>) -> AppConfig {
        AppConfig::resolve(RawSettings {
            supabase_url: url.map(str::to_string),
            supabase_anon_key: key.map(str::to_string),
            ..Default::default()
        })
    }

    #[test]
    fn missing_credentials_select_stub() {
        assert_eq!(connect(&config(None, None)).mode(), BackendMode::Stub);
        assert_eq!(
            connect(&config(Some("https://x.supabase.co"), None)).mode(),
            BackendMode::Stub
        );
        assert_eq!(connect(&config(None, Some("anon"))).mode(), BackendMode::Stub);
    }

    #[test]
    fn invalid_url_falls_back_to_stub() {
        assert_eq!(
            connect(&config(Some("not a url"), Some("anon"))).mode(),
            BackendMode::Stub
        );
    }

    #[test]
    fn full_credentials_select_live_client() {
        assert_eq!(
            connect(&config(Some("https://x.supabase.co"), Some("anon"))).mode(),
            BackendMode::Live
        );
    }
}

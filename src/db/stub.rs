use async_trait::async_trait;
use serde_json::{json, Value};

use super::{BackendClient, BackendMode, Query};
use crate::app_log;
use crate::errors::ServiceError;
use crate::logging::{AppLogger, LogLevel};

/// Stand-in used when no backend is configured. Every call succeeds with an
/// empty result.
#[derive(Debug, Clone)]
pub struct StubClient {
    logger: AppLogger,
}

impl StubClient {
    pub fn new(logger: AppLogger) -> Self {
        Self { logger }
    }

    fn note(&self, action: &str, query: &Query) {
        app_log!(
            self.logger,
            LogLevel::Debug,
            "Stub backend: {} on {} returns empty",
            action,
            query.table_name()
        );
    }
}

#[async_trait]
impl BackendClient for StubClient {
    fn mode(&self) -> BackendMode {
        BackendMode::Stub
    }

    async fn select(&self, query: Query) -> Result<Value, ServiceError> {
        self.note("select", &query);
        Ok(json!([]))
    }

    async fn insert(&self, query: Query, _row: Value) -> Result<Value, ServiceError> {
        self.note("insert", &query);
        Ok(Value::Null)
    }

    async fn update(&self, query: Query, _changes: Value) -> Result<Value, ServiceError> {
        self.note("update", &query);
        Ok(Value::Null)
    }

    async fn delete(&self, query: Query) -> Result<Value, ServiceError> {
        self.note("delete", &query);
        Ok(Value::Null)
    }

    async fn current_user(&self) -> Result<Value, ServiceError> {
        Ok(json!({ "user": null }))
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

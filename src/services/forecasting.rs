//! Client for the external forecasting API.
//!
//! The API owns model training and file storage. It answers failures with
//! HTTP 200 and an `{"error": "..."}` body, which this client turns into
//! [`ServiceError::ExternalApiError`].

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use strum::{AsRefStr, Display, EnumString};
use tracing::{error, info, instrument};
use url::Url;

use crate::errors::ServiceError;

/// One model's forecast: parallel date and value columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSeries {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneForecast {
    pub sarimax: ModelSeries,
    pub xgboost: ModelSeries,
    pub neural_prophet: ModelSeries,
}

impl LaneForecast {
    fn check_shape(&self) -> Result<(), ServiceError> {
        for (model, series) in [
            ("sarimax", &self.sarimax),
            ("xgboost", &self.xgboost),
            ("neural_prophet", &self.neural_prophet),
        ] {
            if series.dates.len() != series.values.len() {
                return Err(ServiceError::ExternalApiError(format!(
                    "{} forecast has {} dates but {} values",
                    model,
                    series.dates.len(),
                    series.values.len()
                )));
            }
        }
        Ok(())
    }
}

pub type MonthlyTrend = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalAnalysis {
    pub total_lanes: u64,
    pub average_rate: f64,
    #[serde(default)]
    pub monthly_trends: MonthlyTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    pub status: String,
}

/// Kind of spreadsheet being uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UploadKind {
    Bid,
    Historical,
    Market,
}

#[derive(Debug, Clone)]
pub struct ForecastApiClient {
    client: reqwest::Client,
    base: Url,
}

impl ForecastApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let base = Url::parse(base_url).map_err(|e| {
            ServiceError::Config(format!("invalid forecasting API URL '{}': {}", base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(ServiceError::Config(format!(
                "forecasting API URL '{}' cannot be a base",
                base_url
            )));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Config("forecasting API URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Twelve-period forecasts from each model for `lane_id`.
    #[instrument(skip(self))]
    pub async fn lane_forecast(&self, lane_id: &str) -> Result<LaneForecast, ServiceError> {
        let url = self.endpoint(&["api", "forecast", lane_id])?;
        let forecast: LaneForecast = self.send(self.client.get(url)).await?;
        forecast.check_shape()?;
        Ok(forecast)
    }

    #[instrument(skip(self))]
    pub async fn historical_analysis(&self) -> Result<HistoricalAnalysis, ServiceError> {
        let url = self.endpoint(&["api", "historical-analysis"])?;
        self.send(self.client.get(url)).await
    }

    /// Sends a file as the multipart field `file`.
    #[instrument(skip(self, content), fields(size = content.len()))]
    pub async fn upload(
        &self,
        kind: UploadKind,
        filename: &str,
        content: Bytes,
    ) -> Result<UploadReceipt, ServiceError> {
        if filename.trim().is_empty() {
            return Err(ServiceError::InvalidInput("upload needs a file name".into()));
        }
        let url = self.endpoint(&["api", "upload", kind.as_ref()])?;
        let part = Part::bytes(content.to_vec()).file_name(filename.to_string());
        let form = Form::new().part("file", part);

        let receipt: UploadReceipt = self.send(self.client.post(url).multipart(form)).await?;
        info!("Uploaded {} file {}", kind, receipt.filename);
        Ok(receipt)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = request.send().await.map_err(|e| {
            error!("Forecasting API unreachable: {}", e);
            ServiceError::from(e)
        })?;
        let status = response.status();
        let body = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&body).map_err(|e| {
            ServiceError::ExternalApiError(format!(
                "forecasting API returned {} with an unreadable body: {}",
                status, e
            ))
        })?;

        if let Some(message) = reported_error(&payload) {
            error!("Forecasting API reported an error: {}", message);
            return Err(ServiceError::ExternalApiError(message));
        }
        if !status.is_success() {
            return Err(ServiceError::ExternalApiError(format!(
                "forecasting API returned {}",
                status
            )));
        }
        serde_json::from_value(payload).map_err(|e| {
            ServiceError::ExternalApiError(format!("unexpected forecasting API response: {}", e))
        })
    }
}

fn reported_error(payload: &Value) -> Option<String> {
    match payload.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_kind_parses_path_values() {
        assert_eq!("bid".parse::<UploadKind>().ok(), Some(UploadKind::Bid));
        assert_eq!(UploadKind::Historical.as_ref(), "historical");
        assert!("invoices".parse::<UploadKind>().is_err());
    }

    #[test]
    fn error_key_is_detected() {
        assert_eq!(
            reported_error(&json!({ "error": "No historical data found" })).as_deref(),
            Some("No historical data found")
        );
        assert!(reported_error(&json!({ "error": null })).is_none());
        assert!(reported_error(&json!({ "filename": "a.csv" })).is_none());
    }

    #[test]
    fn mismatched_series_is_rejected() {
        let series = |n: usize| ModelSeries {
            dates: vec!["2024-01-31".into(); n],
            values: vec![1.0; 2],
        };
        let forecast = LaneForecast {
            sarimax: series(2),
            xgboost: series(3),
            neural_prophet: series(2),
        };
        assert!(forecast.check_shape().is_err());
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client =
            ForecastApiClient::new("http://forecast.internal/v2/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint(&["api", "forecast", "L 1"]).unwrap().as_str(),
            "http://forecast.internal/v2/api/forecast/L%201"
        );
    }
}

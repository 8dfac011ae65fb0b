use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::{Validate, ValidationError};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RateType {
    Contracted,
    Spot,
}

/// Contracted or spot price for a lane over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub id: String,
    pub lane_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    pub effective_date: NaiveDate,
    pub expiration_date: NaiveDate,
    #[serde(rename = "type")]
    pub rate_type: RateType,
    pub created_at: DateTime<Utc>,
}

impl Rate {
    pub fn window_is_ordered(&self) -> bool {
        self.effective_date <= self.expiration_date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_rate_window"))]
pub struct NewRate {
    #[validate(length(min = 1))]
    pub lane_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "positive_amount")]
    pub rate: Decimal,
    pub effective_date: NaiveDate,
    pub expiration_date: NaiveDate,
    #[serde(rename = "type")]
    pub rate_type: RateType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_rate_update_window"))]
pub struct RateUpdate {
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rate_type: Option<RateType>,
}

/// Model-predicted future rate for a lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub id: String,
    pub lane_id: String,
    pub forecast_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub predicted_rate: Decimal,
    pub confidence: f64,
    pub model_version: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewForecast {
    #[validate(length(min = 1))]
    pub lane_id: String,
    pub forecast_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "positive_amount")]
    pub predicted_rate: Decimal,
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
    #[validate(length(min = 1))]
    pub model_version: String,
}

fn positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(ValidationError::new("must_be_positive"));
    }
    Ok(())
}

fn validate_rate_window(rate: &NewRate) -> Result<(), ValidationError> {
    if rate.expiration_date < rate.effective_date {
        return Err(ValidationError::new("expiration_before_effective"));
    }
    Ok(())
}

fn validate_rate_update_window(update: &RateUpdate) -> Result<(), ValidationError> {
    match (update.effective_date, update.expiration_date) {
        (Some(effective), Some(expiration)) if expiration < effective => {
            Err(ValidationError::new("expiration_before_effective"))
        }
        _ => Ok(()),
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Published freight market index reading (e.g. DAT Van National).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketIndex {
    pub id: String,
    pub index_name: String,
    pub value: f64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Regional diesel price per gallon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelPrice {
    pub id: String,
    pub region: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

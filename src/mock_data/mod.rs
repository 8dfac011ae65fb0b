//! Static fixture store used when mock mode is on.
//!
//! Every accessor hands out owned copies, so callers can never alter the
//! fixtures. Writes are simulated: they produce the shape the backend would
//! return but nothing is stored, and later reads still see the original data.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::app_log;
use crate::errors::ServiceError;
use crate::logging::{AppLogger, LogLevel};
use crate::models::{
    Company, EntityKind, EquipmentType, Forecast, FuelPrice, Lane, Location, MarketIndex, Rate,
    Record, Rfp, Tag, User,
};

mod fixtures;

/// A record type with a static fixture set.
pub trait Fixture: Record {
    fn fixtures() -> &'static [Self];
}

#[derive(Debug, Clone)]
pub struct MockStore {
    enabled: bool,
    logger: AppLogger,
}

impl MockStore {
    pub fn new(enabled: bool, logger: AppLogger) -> Self {
        Self { enabled, logger }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn gate(&self, kind: &str) -> bool {
        if !self.enabled {
            app_log!(
                self.logger,
                LogLevel::Debug,
                "Mock data disabled, ignoring request for {}",
                kind
            );
        }
        self.enabled
    }

    /// All fixtures of type `T`, in declaration order.
    pub fn list<T: Fixture>(&self) -> Vec<T> {
        if !self.gate(T::KIND.as_ref()) {
            return Vec::new();
        }
        T::fixtures().to_vec()
    }

    pub fn get_by_id<T: Fixture>(&self, id: &str) -> Option<T> {
        if !self.gate(T::KIND.as_ref()) {
            return None;
        }
        T::fixtures().iter().find(|item| item.id() == id).cloned()
    }

    /// Fixtures whose `field` equals `value` exactly.
    pub fn list_where<T: Fixture>(&self, field: &str, value: impl Into<Value>) -> Vec<T> {
        if !self.gate(T::KIND.as_ref()) {
            return Vec::new();
        }
        let value = value.into();
        T::fixtures()
            .iter()
            .filter(|item| field_equals(*item, field, &value))
            .cloned()
            .collect()
    }

    /// Fixtures for a kind given by name, as JSON. Unknown kinds yield an
    /// empty list.
    pub fn list_raw(&self, kind: &str) -> Vec<Value> {
        if !self.gate(kind) {
            return Vec::new();
        }
        let Ok(kind) = kind.parse::<EntityKind>() else {
            app_log!(
                self.logger,
                LogLevel::Warn,
                "Mock data type '{}' not found",
                kind
            );
            return Vec::new();
        };
        match kind {
            EntityKind::Users => to_values::<User>(),
            EntityKind::Companies => to_values::<Company>(),
            EntityKind::EquipmentTypes => to_values::<EquipmentType>(),
            EntityKind::Locations => to_values::<Location>(),
            EntityKind::Rfps => to_values::<Rfp>(),
            EntityKind::Lanes => to_values::<Lane>(),
            EntityKind::Rates => to_values::<Rate>(),
            EntityKind::Forecasts => to_values::<Forecast>(),
            EntityKind::MarketIndices => to_values::<MarketIndex>(),
            EntityKind::FuelPrices => to_values::<FuelPrice>(),
            EntityKind::Tags => to_values::<Tag>(),
        }
    }

    /// Shape of a freshly inserted row: the input plus a `mock-<millis>` id,
    /// and a creation timestamp when `stamped` is set.
    pub fn simulate_insert<N, T>(&self, input: &N, stamped: bool) -> Result<T, ServiceError>
    where
        N: Serialize,
        T: DeserializeOwned,
    {
        let mut row = as_object(serde_json::to_value(input)?)?;
        row.insert("id".into(), Value::String(mock_id()));
        if stamped {
            row.insert("created_at".into(), Value::String(Utc::now().to_rfc3339()));
        }
        app_log!(self.logger, LogLevel::Debug, "Simulated insert, nothing stored");
        Ok(serde_json::from_value(Value::Object(row))?)
    }

    /// Fixture `id` with `update` merged over it, or `None` if there is no
    /// such fixture.
    pub fn simulate_update<T, U>(&self, id: &str, update: &U) -> Result<Option<T>, ServiceError>
    where
        T: Fixture,
        U: Serialize,
    {
        let Some(current) = self.get_by_id::<T>(id) else {
            return Ok(None);
        };
        let mut row = as_object(serde_json::to_value(&current)?)?;
        row.extend(as_object(serde_json::to_value(update)?)?);
        app_log!(self.logger, LogLevel::Debug, "Simulated update of {} {}", T::KIND, id);
        Ok(Some(serde_json::from_value(Value::Object(row))?))
    }
}

pub fn mock_id() -> String {
    format!("mock-{}", Utc::now().timestamp_millis())
}

fn field_equals<T: Serialize>(item: &T, field: &str, value: &Value) -> bool {
    serde_json::to_value(item)
        .ok()
        .and_then(|row| row.get(field).cloned())
        .is_some_and(|found| &found == value)
}

fn to_values<T: Fixture>() -> Vec<Value> {
    T::fixtures()
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect()
}

fn as_object(value: Value) -> Result<Map<String, Value>, ServiceError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ServiceError::Serialization(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeEnvironment;
    use crate::models::{NewRfp, RfpStatus, RfpUpdate};
    use strum::IntoEnumIterator;

    fn declared(kind: EntityKind) -> Vec<Value> {
        fn rows<T: Fixture>() -> Vec<Value> {
            T::fixtures()
                .iter()
                .map(|item| serde_json::to_value(item).unwrap())
                .collect()
        }
        match kind {
            EntityKind::Users => rows::<User>(),
            EntityKind::Companies => rows::<Company>(),
            EntityKind::EquipmentTypes => rows::<EquipmentType>(),
            EntityKind::Locations => rows::<Location>(),
            EntityKind::Rfps => rows::<Rfp>(),
            EntityKind::Lanes => rows::<Lane>(),
            EntityKind::Rates => rows::<Rate>(),
            EntityKind::Forecasts => rows::<Forecast>(),
            EntityKind::MarketIndices => rows::<MarketIndex>(),
            EntityKind::FuelPrices => rows::<FuelPrice>(),
            EntityKind::Tags => rows::<Tag>(),
        }
    }

    fn store(enabled: bool) -> MockStore {
        MockStore::new(
            enabled,
            AppLogger::new(RuntimeEnvironment::Development, LogLevel::Debug),
        )
    }

    #[test]
    fn lists_fixtures_in_declaration_order() {
        let lanes = store(true).list::<Lane>();
        let ids: Vec<_> = lanes.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(store(true).list::<Location>().len(), 5);
    }

    #[test]
    fn disabled_store_is_empty() {
        let mock = store(false);
        assert!(mock.list::<Rfp>().is_empty());
        assert!(mock.get_by_id::<User>("1").is_none());
        assert!(mock.list_raw("tags").is_empty());
    }

    #[test]
    fn get_by_id_and_list_where() {
        let mock = store(true);
        assert_eq!(mock.get_by_id::<Rfp>("2").unwrap().title, "Spot Market Q1 2023");
        assert!(mock.get_by_id::<Rfp>("99").is_none());

        let rates = mock.list_where::<Rate>("lane_id", "1");
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].id, "1");

        let forecasts = mock.list_where::<Forecast>("lane_id", "1");
        assert_eq!(forecasts.len(), 2);
        assert!(mock.list_where::<Lane>("rfp_id", "7").is_empty());
    }

    #[test]
    fn raw_lists_match_fixtures_for_every_kind() {
        let mock = store(true);
        let expected_sizes = [2, 2, 4, 5, 2, 3, 3, 3, 3, 3, 4];
        for (kind, size) in EntityKind::iter().zip(expected_sizes) {
            let raw = mock.list_raw(kind.as_ref());
            assert_eq!(raw.len(), size, "{kind}");
            assert_eq!(raw, declared(kind), "{kind}");
        }
    }

    #[test]
    fn raw_lists_are_empty_when_mock_flag_unset() {
        let mock = store(false);
        assert!(mock.list_raw("locations").is_empty());
        for kind in EntityKind::iter() {
            assert!(mock.list_raw(kind.as_ref()).is_empty(), "{kind}");
        }
    }

    #[test]
    fn unknown_raw_kind_is_empty() {
        let mock = store(true);
        assert!(mock.list_raw("carriers").is_empty());
        assert_eq!(mock.list_raw("equipment_types").len(), 4);
    }

    #[test]
    fn returned_records_are_copies() {
        let mock = store(true);
        let mut tags = mock.list::<Tag>();
        tags[0].name = "Changed".into();
        assert_eq!(mock.list::<Tag>()[0].name, "High Priority");
    }

    #[test]
    fn simulated_insert_assigns_mock_id() {
        let input = NewRfp {
            title: "Q3 Reefer".into(),
            description: None,
            company_id: "1".into(),
            status: RfpStatus::Draft,
            start_date: "2023-07-01".parse().unwrap(),
            end_date: "2023-09-30".parse().unwrap(),
            created_by: "1".into(),
        };
        let rfp: Rfp = store(true).simulate_insert(&input, true).unwrap();
        assert!(rfp.id.starts_with("mock-"));
        assert_eq!(rfp.title, "Q3 Reefer");
        assert_eq!(store(true).list::<Rfp>().len(), 2);
    }

    #[test]
    fn simulated_update_merges_without_persisting() {
        let mock = store(true);
        let update = RfpUpdate {
            status: Some(RfpStatus::Cancelled),
            ..Default::default()
        };
        let merged: Rfp = mock.simulate_update("1", &update).unwrap().unwrap();
        assert_eq!(merged.status, RfpStatus::Cancelled);
        assert_eq!(merged.title, "Annual Carrier Bid 2023");
        assert_eq!(mock.get_by_id::<Rfp>("1").unwrap().status, RfpStatus::Active);
        assert!(mock
            .simulate_update::<Rfp, _>("404", &update)
            .unwrap()
            .is_none());
    }
}

//! Domain records as stored in the hosted backend.
//!
//! Field names follow the backend's snake_case columns so records round-trip
//! through JSON without renaming.

use serde::{de::DeserializeOwned, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub mod lane;
pub mod market;
pub mod pricing;
pub mod rfp;
pub mod user;

pub use lane::{EquipmentType, Lane, LaneDetail, LaneUpdate, Location, NewLane, NewLocation};
pub use market::{FuelPrice, MarketIndex};
pub use pricing::{Forecast, NewForecast, NewRate, Rate, RateType, RateUpdate};
pub use rfp::{
    LaneCount, LaneTag, NewRfp, NewTag, Rfp, RfpDetail, RfpStatus, RfpTag, RfpUpdate, Tag,
};
pub use user::{AuthUser, Company, CurrentUser, User, UserUpdate};

/// Every entity type that has a fixture set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Users,
    Companies,
    EquipmentTypes,
    Locations,
    Rfps,
    Lanes,
    Rates,
    Forecasts,
    MarketIndices,
    FuelPrices,
    Tags,
}

/// A record addressable by an opaque string identifier.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Record for $ty {
                const KIND: EntityKind = EntityKind::$kind;

                fn id(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

impl_record! {
    User => Users,
    Company => Companies,
    EquipmentType => EquipmentTypes,
    Location => Locations,
    Rfp => Rfps,
    Lane => Lanes,
    Rate => Rates,
    Forecast => Forecasts,
    MarketIndex => MarketIndices,
    FuelPrice => FuelPrices,
    Tag => Tags,
}

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

use super::Fixture;
use crate::models::{
    Company, EquipmentType, Forecast, FuelPrice, Lane, Location, MarketIndex, Rate, RateType,
    Rfp, RfpStatus, Tag, User,
};

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn ts(year: i32, month: u32, d: u32) -> DateTime<Utc> {
    day(year, month, d)
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

static USERS: Lazy<Vec<User>> = Lazy::new(|| {
    vec![
        User {
            id: "1".into(),
            email: "admin@example.com".into(),
            name: "Admin User".into(),
            company_id: "1".into(),
            role: "admin".into(),
            created_at: ts(2023, 1, 1),
        },
        User {
            id: "2".into(),
            email: "user@example.com".into(),
            name: "Regular User".into(),
            company_id: "1".into(),
            role: "user".into(),
            created_at: ts(2023, 1, 2),
        },
    ]
});

static COMPANIES: Lazy<Vec<Company>> = Lazy::new(|| {
    vec![
        Company {
            id: "1".into(),
            name: "Acme Logistics".into(),
            industry: "Transportation".into(),
            created_at: ts(2023, 1, 1),
        },
        Company {
            id: "2".into(),
            name: "XYZ Shipping".into(),
            industry: "Freight".into(),
            created_at: ts(2023, 1, 1),
        },
    ]
});

static EQUIPMENT_TYPES: Lazy<Vec<EquipmentType>> = Lazy::new(|| {
    [
        ("1", "Dry Van", "Standard enclosed trailer"),
        ("2", "Refrigerated", "Temperature-controlled trailer"),
        ("3", "Flatbed", "Open trailer with no sides or roof"),
        ("4", "Tanker", "For liquid or gas transport"),
    ]
    .into_iter()
    .map(|(id, name, description)| EquipmentType {
        id: id.into(),
        name: name.into(),
        description: Some(description.into()),
    })
    .collect()
});

static LOCATIONS: Lazy<Vec<Location>> = Lazy::new(|| {
    [
        ("1", "Los Angeles", "CA", "90001"),
        ("2", "New York", "NY", "10001"),
        ("3", "Chicago", "IL", "60007"),
        ("4", "Dallas", "TX", "75001"),
        ("5", "Atlanta", "GA", "30301"),
    ]
    .into_iter()
    .map(|(id, city, state, zip)| Location {
        id: id.into(),
        city: city.into(),
        state: state.into(),
        zip: zip.into(),
        country: "USA".into(),
    })
    .collect()
});

static RFPS: Lazy<Vec<Rfp>> = Lazy::new(|| {
    vec![
        Rfp {
            id: "1".into(),
            title: "Annual Carrier Bid 2023".into(),
            description: Some("Annual bid for all lanes in the western region".into()),
            company_id: "1".into(),
            status: RfpStatus::Active,
            start_date: day(2023, 1, 1),
            end_date: day(2023, 12, 31),
            created_at: ts(2022, 11, 15),
            created_by: "1".into(),
        },
        Rfp {
            id: "2".into(),
            title: "Spot Market Q1 2023".into(),
            description: Some("Spot market rates for Q1 2023".into()),
            company_id: "1".into(),
            status: RfpStatus::Completed,
            start_date: day(2023, 1, 1),
            end_date: day(2023, 3, 31),
            created_at: ts(2022, 12, 15),
            created_by: "2".into(),
        },
    ]
});

static LANES: Lazy<Vec<Lane>> = Lazy::new(|| {
    let lane = |id: &str,
                rfp: &str,
                origin: &str,
                destination: &str,
                equipment: &str,
                miles: i32,
                volume: i32,
                frequency: &str,
                notes: &str,
                created_at: DateTime<Utc>| Lane {
        id: id.into(),
        rfp_id: rfp.into(),
        origin_id: origin.into(),
        destination_id: destination.into(),
        equipment_type_id: equipment.into(),
        miles,
        volume,
        frequency: frequency.into(),
        notes: Some(notes.into()),
        created_at,
    };
    vec![
        lane("1", "1", "1", "2", "1", 2800, 10, "weekly", "High priority lane", ts(2022, 11, 16)),
        lane(
            "2",
            "1",
            "1",
            "3",
            "2",
            2100,
            5,
            "weekly",
            "Temperature sensitive goods",
            ts(2022, 11, 16),
        ),
        lane("3", "2", "3", "4", "1", 900, 3, "daily", "Regular shipments", ts(2022, 12, 16)),
    ]
});

static RATES: Lazy<Vec<Rate>> = Lazy::new(|| {
    vec![
        Rate {
            id: "1".into(),
            lane_id: "1".into(),
            rate: dec!(3500),
            effective_date: day(2023, 1, 1),
            expiration_date: day(2023, 12, 31),
            rate_type: RateType::Contracted,
            created_at: ts(2022, 11, 20),
        },
        Rate {
            id: "2".into(),
            lane_id: "2".into(),
            rate: dec!(4200),
            effective_date: day(2023, 1, 1),
            expiration_date: day(2023, 12, 31),
            rate_type: RateType::Contracted,
            created_at: ts(2022, 11, 20),
        },
        Rate {
            id: "3".into(),
            lane_id: "3".into(),
            rate: dec!(1800),
            effective_date: day(2023, 1, 1),
            expiration_date: day(2023, 3, 31),
            rate_type: RateType::Spot,
            created_at: ts(2022, 12, 20),
        },
    ]
});

static FORECASTS: Lazy<Vec<Forecast>> = Lazy::new(|| {
    [
        ("1", "1", day(2023, 2, 1), dec!(3600), 0.85),
        ("2", "1", day(2023, 3, 1), dec!(3650), 0.82),
        ("3", "2", day(2023, 2, 1), dec!(4250), 0.88),
    ]
    .into_iter()
    .map(|(id, lane_id, forecast_date, predicted_rate, confidence)| Forecast {
        id: id.into(),
        lane_id: lane_id.into(),
        forecast_date,
        predicted_rate,
        confidence,
        model_version: "1.0".into(),
        created_at: ts(2023, 1, 15),
    })
    .collect()
});

static MARKET_INDICES: Lazy<Vec<MarketIndex>> = Lazy::new(|| {
    [
        ("1", "DAT Van National", 2.45, 15),
        ("2", "DAT Van National", 2.48, 22),
        ("3", "DAT Reefer National", 2.95, 15),
    ]
    .into_iter()
    .map(|(id, index_name, value, d)| MarketIndex {
        id: id.into(),
        index_name: index_name.into(),
        value,
        date: day(2023, 1, d),
        created_at: ts(2023, 1, d),
    })
    .collect()
});

static FUEL_PRICES: Lazy<Vec<FuelPrice>> = Lazy::new(|| {
    [
        ("1", "National", dec!(4.25), 15),
        ("2", "National", dec!(4.30), 22),
        ("3", "West Coast", dec!(4.85), 15),
    ]
    .into_iter()
    .map(|(id, region, price, d)| FuelPrice {
        id: id.into(),
        region: region.into(),
        price,
        date: day(2023, 1, d),
        created_at: ts(2023, 1, d),
    })
    .collect()
});

static TAGS: Lazy<Vec<Tag>> = Lazy::new(|| {
    [
        ("1", "High Priority", "red"),
        ("2", "Cost Saving", "green"),
        ("3", "Seasonal", "blue"),
        ("4", "Problem Lane", "orange"),
    ]
    .into_iter()
    .map(|(id, name, color)| Tag {
        id: id.into(),
        name: name.into(),
        color: color.into(),
    })
    .collect()
});

macro_rules! impl_fixture {
    ($($ty:ty => $set:ident),+ $(,)?) => {
        $(
            impl Fixture for $ty {
                fn fixtures() -> &'static [Self] {
                    &$set
                }
            }
        )+
    };
}

impl_fixture! {
    User => USERS,
    Company => COMPANIES,
    EquipmentType => EQUIPMENT_TYPES,
    Location => LOCATIONS,
    Rfp => RFPS,
    Lane => LANES,
    Rate => RATES,
    Forecast => FORECASTS,
    MarketIndex => MARKET_INDICES,
    FuelPrice => FUEL_PRICES,
    Tag => TAGS,
}

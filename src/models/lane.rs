use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::pricing::Rate;
use super::rfp::{Rfp, Tag};

/// Origin-destination freight route inside an RFP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub id: String,
    pub rfp_id: String,
    pub origin_id: String,
    pub destination_id: String,
    pub equipment_type_id: String,
    pub miles: i32,
    pub volume: i32,
    pub frequency: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewLane {
    #[validate(length(min = 1))]
    pub rfp_id: String,
    #[validate(length(min = 1))]
    pub origin_id: String,
    #[validate(length(min = 1))]
    pub destination_id: String,
    #[validate(length(min = 1))]
    pub equipment_type_id: String,
    #[validate(range(min = 1))]
    pub miles: i32,
    #[validate(range(min = 0))]
    pub volume: i32,
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LaneUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub miles: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub volume: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl Location {
    /// Case-insensitive substring match on city, state or zip.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [&self.city, &self.state, &self.zip]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewLocation {
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    pub zip: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Lane with its locations, equipment and rates expanded. `rfp` and `tags`
/// are only present on single-lane reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneDetail {
    #[serde(flatten)]
    pub lane: Lane,
    #[serde(default)]
    pub origin: Option<Location>,
    #[serde(default)]
    pub destination: Option<Location>,
    #[serde(default)]
    pub equipment_type: Option<EquipmentType>,
    #[serde(default)]
    pub rates: Vec<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rfp: Option<Rfp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

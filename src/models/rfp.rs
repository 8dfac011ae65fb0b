use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::{Validate, ValidationError};

use super::user::User;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RfpStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

/// A freight-rate bidding round scoped to a company and a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rfp {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub company_id: String,
    pub status: RfpStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    /// Id of the creating user
    pub created_by: String,
}

impl Rfp {
    pub fn window_is_ordered(&self) -> bool {
        self.start_date <= self.end_date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_new_rfp_window"))]
pub struct NewRfp {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub company_id: String,
    pub status: RfpStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1))]
    pub created_by: String,
}

/// Partial RFP change. When both dates are present they must be ordered;
/// a single date is checked against the stored row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_rfp_update_window"))]
pub struct RfpUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RfpStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

fn validate_new_rfp_window(rfp: &NewRfp) -> Result<(), ValidationError> {
    if rfp.end_date < rfp.start_date {
        return Err(ValidationError::new("end_before_start"));
    }
    Ok(())
}

fn validate_rfp_update_window(update: &RfpUpdate) -> Result<(), ValidationError> {
    match (update.start_date, update.end_date) {
        (Some(start), Some(end)) if end < start => Err(ValidationError::new("end_before_start")),
        _ => Ok(()),
    }
}

/// Number of lanes attached to an RFP.
///
/// The backend's embedded aggregate arrives as `[{"count": n}]`; a bare
/// `{"count": n}` is accepted as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LaneCount {
    pub count: u64,
}

impl<'de> Deserialize<'de> for LaneCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Counted {
            count: u64,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Object(Counted),
            Rows(Vec<Counted>),
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::Object(counted) => LaneCount {
                count: counted.count,
            },
            Shape::Rows(rows) => LaneCount {
                count: rows.into_iter().map(|row| row.count).sum(),
            },
        })
    }
}

/// RFP with its lane count, creating user and tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfpDetail {
    #[serde(flatten)]
    pub rfp: Rfp,
    #[serde(default)]
    pub lanes: LaneCount,
    #[serde(default)]
    pub creator: Option<User>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTag {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1))]
    pub color: String,
}

/// Row of the `rfp_tags` join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfpTag {
    #[serde(default)]
    pub id: Option<String>,
    pub rfp_id: String,
    pub tag_id: String,
}

/// Row of the `lane_tags` join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneTag {
    #[serde(default)]
    pub id: Option<String>,
    pub lane_id: String,
    pub tag_id: String,
}

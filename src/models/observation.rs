use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// Something the investigator noticed on site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: String,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub bookmarked: bool,
}

impl Observation {
    pub fn new(
        description: impl Into<String>,
        location: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            created_at: Utc::now(),
            description: description.into(),
            location: location.into(),
            notes: notes.into(),
            bookmarked: false,
        }
    }
}

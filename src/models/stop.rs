use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Stop {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub arrived_at: DateTime<Utc>,
    /// `None` means the traveller is still parked here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StopInput {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub arrived_at: DateTime<Utc>,
    #[serde(default)]
    pub departed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl StopInput {
    pub fn new(name: impl Into<String>, arrived_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            location: None,
            arrived_at,
            departed_at: None,
            notes: None,
        }
    }

    pub fn departing(mut self, departed_at: DateTime<Utc>) -> Self {
        self.departed_at = Some(departed_at);
        self
    }
}

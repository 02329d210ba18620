use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One flattened (trip, stop) pair. A trip without stops yields a single row
/// whose stop fields are all `None` and whose `tags` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub trip_id: Uuid,
    pub trip_name: String,
    pub trip_start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrived_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_notes: Option<String>,
    /// Slugs, ascending.
    pub tags: Vec<String>,
}

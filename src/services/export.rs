use std::sync::Arc;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use tracing::debug;

use crate::{
    error::{AppError, ResultExt},
    models::export::ExportRow,
    store::{StopStore, TagStore, TripStore},
};

pub const CSV_HEADERS: [&str; 10] = [
    "trip_id",
    "trip_name",
    "trip_start_date",
    "trip_end_date",
    "stop_name",
    "stop_location",
    "arrived_at",
    "departed_at",
    "stop_notes",
    "tags",
];

/// Flattens trips, stops and tag slugs into [`ExportRow`]s.
///
/// The reads are independent statements, not one transaction: writers that
/// land mid-export can show up in some rows and not others.
#[derive(Clone)]
pub struct ExportService {
    trips: Arc<dyn TripStore>,
    stops: Arc<dyn StopStore>,
    tags: Arc<dyn TagStore>,
}

impl ExportService {
    pub fn new(
        trips: Arc<dyn TripStore>,
        stops: Arc<dyn StopStore>,
        tags: Arc<dyn TagStore>,
    ) -> Self {
        Self { trips, stops, tags }
    }

    /// One row per stop, trips in listing order and stops by arrival. A trip
    /// without stops still gets one row. The first store error aborts the
    /// whole export.
    pub async fn export(&self) -> Result<Vec<ExportRow>, AppError> {
        let trips = self.trips.list().await.context("export_service.export")?;
        let mut rows = Vec::with_capacity(trips.len());

        for trip in trips {
            let base = ExportRow {
                trip_id: trip.id,
                trip_name: trip.name,
                trip_start_date: trip.start_date,
                trip_end_date: trip.end_date,
                stop_name: None,
                stop_location: None,
                arrived_at: None,
                departed_at: None,
                stop_notes: None,
                tags: Vec::new(),
            };

            let stops = self
                .stops
                .list_by_trip(trip.id)
                .await
                .context("export_service.export")?;
            if stops.is_empty() {
                rows.push(base);
                continue;
            }

            for stop in stops {
                let tags = self
                    .tags
                    .list_by_stop(stop.id)
                    .await
                    .context("export_service.export")?;
                rows.push(ExportRow {
                    stop_name: Some(stop.name),
                    stop_location: stop.location,
                    arrived_at: Some(stop.arrived_at),
                    departed_at: stop.departed_at,
                    stop_notes: stop.notes,
                    tags: tags.into_iter().map(|tag| tag.slug).collect(),
                    ..base.clone()
                });
            }
        }

        debug!(rows = rows.len(), "export assembled");
        Ok(rows)
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn csv_record(row: &ExportRow) -> [String; 10] {
    [
        row.trip_id.to_string(),
        row.trip_name.clone(),
        format_date(Some(row.trip_start_date)),
        format_date(row.trip_end_date),
        row.stop_name.clone().unwrap_or_default(),
        row.stop_location.clone().unwrap_or_default(),
        format_timestamp(row.arrived_at),
        format_timestamp(row.departed_at),
        row.stop_notes.clone().unwrap_or_default(),
        row.tags.join("|"),
    ]
}

/// Renders rows as CSV with a header line. Absent values are empty fields and
/// tags are joined with `|`.
pub fn to_csv(rows: &[ExportRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADERS)
        .map_err(|err| AppError::Other(err.into()))?;
    for row in rows {
        writer
            .write_record(csv_record(row))
            .map_err(|err| AppError::Other(err.into()))?;
    }
    writer
        .into_inner()
        .map_err(|err| AppError::Other(anyhow::anyhow!("flush csv export: {err}")))
}

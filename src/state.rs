use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{export::ExportService, stop::StopService, tag::TagService, trip::TripService},
    store::{SqliteStopStore, SqliteTagStore, SqliteTripStore, StopStore, TagStore, TripStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    pub trips: TripService,
    pub stops: StopService,
    pub tags: TagService,
    pub export: ExportService,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool) -> Self {
        let trip_store: Arc<dyn TripStore> = Arc::new(SqliteTripStore::new(db.clone()));
        let stop_store: Arc<dyn StopStore> = Arc::new(SqliteStopStore::new(db.clone()));
        let tag_store: Arc<dyn TagStore> = Arc::new(SqliteTagStore::new(db.clone()));

        Self {
            config,
            db,
            trips: TripService::new(trip_store.clone()),
            stops: StopService::new(trip_store.clone(), stop_store.clone(), tag_store.clone()),
            tags: TagService::new(tag_store.clone()),
            export: ExportService::new(trip_store, stop_store, tag_store),
        }
    }
}

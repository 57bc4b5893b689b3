use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::queries;
use crate::models::BusinessHours;
use crate::services::cache::Cache;
use crate::services::lookup::VehicleLookupProvider;
use crate::services::pricing::PriceTable;
use crate::services::ranking::SlotScorer;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub prices: PriceTable,
    pub lookup: Box<dyn VehicleLookupProvider>,
    pub cache: Box<dyn Cache>,
    pub scorer: Box<dyn SlotScorer>,
}

impl AppState {
    /// Effective opening hours: the admin-saved settings row when present,
    /// otherwise the configured default week.
    pub fn business_hours(&self) -> BusinessHours {
        let saved = {
            let db = self.db.lock().unwrap();
            queries::get_settings(&db, "default")
                .ok()
                .flatten()
                .and_then(|s| s.business_hours)
        };

        saved
            .and_then(|json| BusinessHours::from_json(&json).ok())
            .or_else(|| BusinessHours::from_json(&self.config.default_business_hours).ok())
            .unwrap_or(BusinessHours { days: vec![] })
    }
}

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::Vehicle;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LookupRequest {
    pub registration: String,
}

// POST /api/vehicles/lookup
pub async fn lookup_vehicle(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LookupRequest>,
) -> Result<Json<Vehicle>, AppError> {
    let registration = Vehicle::normalise_registration(&body.registration);
    if registration.is_empty() || registration.len() > 8 {
        return Err(AppError::Validation(format!(
            "invalid registration: {}",
            body.registration
        )));
    }

    let cache_key = format!("vehicle:{registration}");
    if let Some(cached) = state.cache.get(&cache_key) {
        if let Ok(vehicle) = serde_json::from_str::<Vehicle>(&cached) {
            tracing::debug!(registration = %registration, "vehicle served from cache");
            return Ok(Json(vehicle));
        }
        // Unreadable cache entries are dropped, not returned.
        state.cache.invalidate(&cache_key);
    }

    let vehicle = state
        .lookup
        .lookup(&registration)
        .await
        .map_err(|e| AppError::Lookup(e.to_string()))?;

    if let Ok(json) = serde_json::to_string(&vehicle) {
        state.cache.set(
            &cache_key,
            json,
            Duration::from_secs(state.config.vehicle_cache_ttl_secs),
        );
    }

    tracing::info!(registration = %registration, "vehicle lookup completed");
    Ok(Json(vehicle))
}

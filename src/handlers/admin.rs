use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{AppointmentStatus, BusinessHours};
use crate::services::pricing::PriceTable;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/status
#[derive(Serialize)]
pub struct StatusResponse {
    garage_name: String,
    appointments_today: i64,
    upcoming_count: i64,
    pending_count: i64,
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let today = Utc::now().naive_utc().date();
    let (stats, garage_name) = {
        let db = state.db.lock().unwrap();
        let stats = queries::get_dashboard_stats(&db, today)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let garage_name = queries::get_settings(&db, "default")
            .ok()
            .flatten()
            .map(|s| s.garage_name)
            .unwrap_or_default();
        (stats, garage_name)
    };

    Ok(Json(StatusResponse {
        garage_name,
        appointments_today: stats.appointments_today,
        upcoming_count: stats.upcoming_count,
        pending_count: stats.pending_count,
    }))
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct AppointmentResponse {
    id: String,
    reference: String,
    customer_name: String,
    customer_phone: Option<String>,
    vehicle_reg: String,
    service: String,
    date: String,
    start_time: String,
    quoted_price: f64,
    status: String,
    notes: Option<String>,
    created_at: String,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50);
    let status_filter = query.status.as_deref();

    let appointments = {
        let db = state.db.lock().unwrap();
        queries::get_all_appointments(&db, status_filter, limit)
            .map_err(|e| AppError::Internal(e.to_string()))?
    };

    let response: Vec<AppointmentResponse> = appointments
        .into_iter()
        .map(|a| AppointmentResponse {
            id: a.id,
            reference: a.reference,
            customer_name: a.customer_name,
            customer_phone: a.customer_phone,
            vehicle_reg: a.vehicle_reg,
            service: a.service_type,
            date: a.date.format("%Y-%m-%d").to_string(),
            start_time: a.start_time.format("%H:%M").to_string(),
            quoted_price: a.quoted_price,
            status: a.status.as_str().to_string(),
            notes: a.notes,
            created_at: a.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}

// POST /api/admin/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_appointment_status(&db, &id, &AppointmentStatus::Cancelled)
            .map_err(|e| AppError::Internal(e.to_string()))?
    };

    if updated {
        Ok(Json(serde_json::json!({"ok": true})))
    } else {
        Err(AppError::NotFound(format!("booking {id}")))
    }
}

// GET /api/admin/settings
#[derive(Serialize)]
pub struct SettingsResponse {
    garage_name: String,
    business_hours: Option<String>,
    business_hours_readable: String,
    timezone: String,
}

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SettingsResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let saved = {
        let db = state.db.lock().unwrap();
        queries::get_settings(&db, "default").ok().flatten()
    };

    let hours = state.business_hours();

    match saved {
        Some(s) => Ok(Json(SettingsResponse {
            garage_name: s.garage_name,
            business_hours: s.business_hours,
            business_hours_readable: hours.to_human_readable(),
            timezone: s.timezone,
        })),
        None => Ok(Json(SettingsResponse {
            garage_name: String::new(),
            business_hours: Some(state.config.default_business_hours.clone()),
            business_hours_readable: hours.to_human_readable(),
            timezone: "Europe/London".to_string(),
        })),
    }
}

// POST /api/admin/settings
#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub garage_name: Option<String>,
    pub business_hours: Option<String>,
    pub timezone: Option<String>,
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    // Reject malformed hours before they reach storage; everything reading
    // them back assumes they validated once.
    if let Some(hours_json) = &body.business_hours {
        BusinessHours::from_json(hours_json)
            .map_err(|e| AppError::Validation(format!("invalid business hours: {e}")))?;
    }

    let db = state.db.lock().unwrap();

    let mut settings = queries::get_settings(&db, "default")
        .ok()
        .flatten()
        .unwrap_or(queries::GarageSettings {
            id: "default".to_string(),
            garage_name: String::new(),
            business_hours: None,
            timezone: "Europe/London".to_string(),
        });

    if let Some(name) = body.garage_name {
        settings.garage_name = name;
    }
    if let Some(hours) = body.business_hours {
        settings.business_hours = Some(hours);
    }
    if let Some(tz) = body.timezone {
        settings.timezone = tz;
    }

    queries::save_settings(&db, &settings).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(serde_json::json!({"ok": true})))
}

// GET /api/admin/prices
pub async fn get_prices(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PriceTable>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    Ok(Json(state.prices.clone()))
}

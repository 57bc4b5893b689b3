use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::quotes::QuoteQuery;
use crate::models::{Appointment, AppointmentStatus, Vehicle};
use crate::services::scheduling;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub vehicle_reg: String,
    pub service: String,
    pub engine_cc: Option<u32>,
    pub fuel: Option<String>,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub reference: String,
    pub date: String,
    pub start_time: String,
    pub service: String,
    pub quoted_price: f64,
    pub status: String,
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let customer_name = body.customer_name.trim().to_string();
    if customer_name.is_empty() {
        return Err(AppError::Validation("customer_name is required".to_string()));
    }

    let vehicle_reg = Vehicle::normalise_registration(&body.vehicle_reg);
    if vehicle_reg.is_empty() || vehicle_reg.len() > 8 {
        return Err(AppError::Validation(format!(
            "invalid registration: {}",
            body.vehicle_reg
        )));
    }

    let (service, engine_cc, fuel) = super::quotes::parse_quote_inputs(&QuoteQuery {
        service: body.service.clone(),
        engine_cc: body.engine_cc,
        fuel: body.fuel.clone(),
    })?;

    let date = chrono::NaiveDate::parse_from_str(&body.date, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!("invalid date: {} (expected YYYY-MM-DD)", body.date))
    })?;
    let start_time = NaiveTime::parse_from_str(&body.time, "%H:%M")
        .map_err(|_| AppError::Validation(format!("invalid time: {} (expected HH:MM)", body.time)))?;

    let hours = state.business_hours();
    let now = Utc::now().naive_utc();

    // Priced server-side from the same table the quote endpoints read.
    let quoted_price = state.prices.service_price(service, engine_cc, fuel);

    let appointment = {
        let db = state.db.lock().unwrap();

        scheduling::validate_booking_slot(
            &db,
            date,
            start_time,
            &hours,
            state.config.slot_minutes,
            now,
        )?;

        let id = Uuid::new_v4().to_string();
        let reference = booking_reference(&id);
        let created_at = now;

        let appointment = Appointment {
            id,
            reference,
            customer_name,
            customer_phone: body.customer_phone,
            vehicle_reg,
            service_type: service.as_str().to_string(),
            date,
            start_time,
            quoted_price,
            status: AppointmentStatus::Confirmed,
            notes: body.notes,
            created_at,
            updated_at: created_at,
        };

        if let Err(e) = queries::create_appointment(&db, &appointment) {
            // Two customers racing for the same slot: the unique index is
            // the arbiter.
            if queries::is_slot_taken_error(&e) {
                return Err(AppError::SlotUnavailable(
                    "Sorry, that slot was just taken. Could you pick a different time?"
                        .to_string(),
                ));
            }
            return Err(AppError::Internal(e.to_string()));
        }

        appointment
    };

    tracing::info!(
        reference = %appointment.reference,
        date = %appointment.date,
        time = %appointment.start_time,
        service = %appointment.service_type,
        "booking created"
    );

    Ok(Json(BookingResponse {
        id: appointment.id,
        reference: appointment.reference,
        date: appointment.date.format("%Y-%m-%d").to_string(),
        start_time: appointment.start_time.format("%H:%M").to_string(),
        service: appointment.service_type,
        quoted_price: appointment.quoted_price,
        status: appointment.status.as_str().to_string(),
    }))
}

// GET /api/bookings/:reference
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(reference): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let reference = reference.trim().to_uppercase();

    let appointment = {
        let db = state.db.lock().unwrap();
        queries::get_appointment_by_reference(&db, &reference)
            .map_err(|e| AppError::Internal(e.to_string()))?
    }
    .ok_or_else(|| AppError::NotFound(format!("booking {reference}")))?;

    Ok(Json(BookingResponse {
        id: appointment.id,
        reference: appointment.reference,
        date: appointment.date.format("%Y-%m-%d").to_string(),
        start_time: appointment.start_time.format("%H:%M").to_string(),
        service: appointment.service_type,
        quoted_price: appointment.quoted_price,
        status: appointment.status.as_str().to_string(),
    }))
}

fn booking_reference(id: &str) -> String {
    let short: String = id.chars().filter(|c| *c != '-').take(6).collect();
    format!("GB-{}", short.to_uppercase())
}

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::services::ranking::{self, DayContext};
use crate::services::slots;
use crate::state::AppState;

fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date: {s} (expected YYYY-MM-DD)")))
}

// GET /api/slots
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

#[derive(Serialize)]
pub struct SlotResponse {
    date: String,
    start_time: String,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    date: String,
    slot_minutes: u32,
    slots: Vec<SlotResponse>,
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = parse_date(&query.date)?;
    let hours = state.business_hours();

    let booked = {
        let db = state.db.lock().unwrap();
        queries::booked_times(&db, date).map_err(|e| AppError::Internal(e.to_string()))?
    };

    let now = Utc::now().naive_utc();
    let available = slots::available_slots(date, &hours, &booked, state.config.slot_minutes, now);

    Ok(Json(SlotsResponse {
        date: date.format("%Y-%m-%d").to_string(),
        slot_minutes: state.config.slot_minutes,
        slots: available
            .iter()
            .map(|s| SlotResponse {
                date: s.date.format("%Y-%m-%d").to_string(),
                start_time: s.start_time.format("%H:%M").to_string(),
            })
            .collect(),
    }))
}

// GET /api/slots/suggestions
#[derive(Deserialize)]
pub struct SuggestionsQuery {
    pub from: Option<String>,
    pub days: Option<i64>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SuggestionResponse {
    date: String,
    start_time: String,
    score: f64,
}

pub async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<Vec<SuggestionResponse>>, AppError> {
    let now = Utc::now().naive_utc();
    let today = now.date();

    let from = match query.from.as_deref() {
        Some(s) => parse_date(s)?,
        None => today + Duration::days(1),
    };
    let days = query.days.unwrap_or(7).clamp(1, 30);
    let limit = query.limit.unwrap_or(10);

    let hours = state.business_hours();
    let mut candidates = Vec::new();

    for offset in 0..days {
        let date = from + Duration::days(offset);

        let (booked, bookings_that_day) = {
            let db = state.db.lock().unwrap();
            let booked =
                queries::booked_times(&db, date).map_err(|e| AppError::Internal(e.to_string()))?;
            let count = queries::bookings_count_for_date(&db, date)
                .map_err(|e| AppError::Internal(e.to_string()))?;
            (booked, count)
        };

        let capacity = slots::available_slots(
            date,
            &hours,
            &HashSet::new(),
            state.config.slot_minutes,
            now,
        )
        .len();

        let ctx = DayContext {
            days_ahead: (date - today).num_days(),
            bookings_that_day,
            capacity,
        };

        for slot in
            slots::available_slots(date, &hours, &booked, state.config.slot_minutes, now)
        {
            candidates.push((slot, ctx));
        }
    }

    let ranked = ranking::rank_slots(state.scorer.as_ref(), candidates);

    Ok(Json(
        ranked
            .into_iter()
            .take(limit)
            .map(|s| SuggestionResponse {
                date: s.slot.date.format("%Y-%m-%d").to_string(),
                start_time: s.slot.start_time.format("%H:%M").to_string(),
                score: s.score,
            })
            .collect(),
    ))
}

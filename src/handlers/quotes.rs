use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{EngineBand, FuelType, ServiceType};
use crate::services::combo;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct QuoteQuery {
    pub service: String,
    pub engine_cc: Option<u32>,
    pub fuel: Option<String>,
}

pub(crate) fn parse_quote_inputs(
    query: &QuoteQuery,
) -> Result<(ServiceType, u32, FuelType), AppError> {
    let service = ServiceType::parse(&query.service)
        .ok_or_else(|| AppError::Validation(format!("unknown service type: {}", query.service)))?;

    let fuel = FuelType::parse(query.fuel.as_deref().unwrap_or(""));

    // MOT pricing is flat, so the engine size is only required for serviced
    // jobs.
    let engine_cc = match service {
        ServiceType::Mot => query.engine_cc.unwrap_or(0),
        _ => match query.engine_cc {
            Some(cc) if cc > 0 => cc,
            _ => {
                return Err(AppError::Validation(
                    "engine_cc must be a positive capacity in cc".to_string(),
                ))
            }
        },
    };

    Ok((service, engine_cc, fuel))
}

// GET /api/quotes
#[derive(Serialize)]
pub struct QuoteResponse {
    service: String,
    display_name: String,
    engine_band: String,
    fuel: String,
    price: f64,
}

pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<QuoteResponse>, AppError> {
    let (service, engine_cc, fuel) = parse_quote_inputs(&query)?;
    let price = state.prices.service_price(service, engine_cc, fuel);

    Ok(Json(QuoteResponse {
        service: service.as_str().to_string(),
        display_name: service.display_name().to_string(),
        engine_band: EngineBand::from_capacity(engine_cc).as_str().to_string(),
        fuel: fuel.as_str().to_string(),
        price,
    }))
}

// GET /api/quotes/combo
#[derive(Serialize)]
pub struct ComboQuoteResponse {
    service: String,
    service_price: f64,
    mot_price: f64,
    total_individual: f64,
    total_combo: f64,
    savings: f64,
}

pub async fn get_combo_quote(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<ComboQuoteResponse>, AppError> {
    let (service, engine_cc, fuel) = parse_quote_inputs(&query)?;

    let quote = combo::combo_for_service(&state.prices, service, engine_cc, fuel)?;
    let service_price = state.prices.service_price(service, engine_cc, fuel);

    Ok(Json(ComboQuoteResponse {
        service: service.as_str().to_string(),
        service_price,
        mot_price: state.prices.mot_price,
        total_individual: quote.total_individual,
        total_combo: quote.total_combo,
        savings: quote.savings,
    }))
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::combo::ComboError;
use crate::services::pricing::PricingError;
use crate::services::scheduling::SchedulingError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("vehicle lookup error: {0}")]
    Lookup(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    SlotUnavailable(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Lookup(_) => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::SlotUnavailable(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<ComboError> for AppError {
    fn from(err: ComboError) -> Self {
        match err {
            // A bad discount is a configuration defect, not user input.
            ComboError::InvalidDiscount(msg) => AppError::Config(msg),
            ComboError::NoBundle(service) => {
                AppError::Validation(format!("no combo bundle exists for {service}"))
            }
        }
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::Conflict => AppError::SlotUnavailable(err.to_string()),
            _ => AppError::Validation(err.to_string()),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::models::{FuelType, ServiceType};
use crate::services::pricing::{round_pence, PriceTable};

#[derive(Debug, thiserror::Error)]
pub enum ComboError {
    #[error("invalid combo discount: {0}")]
    InvalidDiscount(String),

    #[error("no combo bundle exists for {0}")]
    NoBundle(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboQuote {
    pub total_individual: f64,
    pub total_combo: f64,
    pub savings: f64,
}

/// Bundle arithmetic: `total_individual = base + addon`,
/// `total_combo = total_individual - discount`, `savings = discount`.
/// A discount of zero or one that swallows the whole bill is a
/// configuration defect, not a user-facing condition.
pub fn calculate_combo(
    base_price: f64,
    addon_price: f64,
    discount: f64,
) -> Result<ComboQuote, ComboError> {
    let total_individual = round_pence(base_price + addon_price);

    if discount <= 0.0 || !discount.is_finite() {
        return Err(ComboError::InvalidDiscount(format!(
            "discount must be positive, got {discount}"
        )));
    }
    if discount >= total_individual {
        return Err(ComboError::InvalidDiscount(format!(
            "discount {discount} is not less than the combined price {total_individual}"
        )));
    }

    Ok(ComboQuote {
        total_individual,
        total_combo: round_pence(total_individual - discount),
        savings: round_pence(discount),
    })
}

/// Quote a service bundled with an MOT. The MOT figure comes from the same
/// price table used for standalone MOT quotes.
pub fn combo_for_service(
    table: &PriceTable,
    service: ServiceType,
    engine_cc: u32,
    fuel: FuelType,
) -> Result<ComboQuote, ComboError> {
    let discount = table
        .combo_discount(service)
        .ok_or_else(|| ComboError::NoBundle(service.as_str().to_string()))?;

    let base = table.service_price(service, engine_cc, fuel);
    calculate_combo(base, table.mot_price, discount)
}

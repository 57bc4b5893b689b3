use serde::{Deserialize, Serialize};

use crate::models::FuelType;

/// A vehicle record as supplied by the lookup collaborator. Validated once
/// at the provider boundary; everything downstream takes it as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub registration: String,
    pub engine_capacity_cc: u32,
    pub fuel_type: FuelType,
    pub make: Option<String>,
    pub model: Option<String>,
    pub colour: Option<String>,
    pub year: Option<i32>,
    pub mot_expiry: Option<chrono::NaiveDate>,
}

impl Vehicle {
    /// Normalises a registration for storage and cache keys: uppercase,
    /// no interior whitespace.
    pub fn normalise_registration(raw: &str) -> String {
        raw.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_registration() {
        assert_eq!(Vehicle::normalise_registration("ab12 cde"), "AB12CDE");
        assert_eq!(Vehicle::normalise_registration(" AB12CDE "), "AB12CDE");
        assert_eq!(Vehicle::normalise_registration("ab 12 cde"), "AB12CDE");
    }
}

use serde::{Deserialize, Serialize};

use crate::models::{EngineBand, FuelType, ServiceType};

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("price table configuration error: {0}")]
    Configuration(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandPrices {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

impl BandPrices {
    pub fn for_band(&self, band: EngineBand) -> f64 {
        match band {
            EngineBand::Small => self.small,
            EngineBand::Medium => self.medium,
            EngineBand::Large => self.large,
        }
    }
}

/// Base prices and adjustments for every quotable job. Loaded once at
/// process start and never mutated; quotes must stay reproducible between
/// the "from only" display and the post-lookup actual price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTable {
    pub interim: BandPrices,
    pub full: BandPrices,
    /// Flat MOT fee. Engine size and fuel type never affect it, and combo
    /// quotes use this same figure — there is no separate display price.
    pub mot_price: f64,
    pub diesel_surcharge: f64,
    #[serde(default)]
    pub hybrid_adjustment: f64,
    #[serde(default)]
    pub electric_adjustment: f64,
    pub interim_combo_discount: f64,
    pub full_combo_discount: f64,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            interim: BandPrices {
                small: 85.00,
                medium: 95.00,
                large: 110.00,
            },
            full: BandPrices {
                small: 149.00,
                medium: 169.00,
                large: 189.00,
            },
            mot_price: 40.00,
            diesel_surcharge: 15.00,
            hybrid_adjustment: 0.0,
            electric_adjustment: 0.0,
            interim_combo_discount: 10.00,
            full_combo_discount: 15.00,
        }
    }
}

impl PriceTable {
    pub fn from_json(s: &str) -> Result<Self, PricingError> {
        let table: PriceTable = serde_json::from_str(s)
            .map_err(|e| PricingError::Configuration(format!("invalid price table JSON: {e}")))?;
        table.validate()?;
        Ok(table)
    }

    /// Rejects a malformed table up front so quoting itself never fails.
    /// Band prices must be monotonic non-decreasing small -> large.
    pub fn validate(&self) -> Result<(), PricingError> {
        for (name, bands) in [("interim", &self.interim), ("full", &self.full)] {
            for (band, price) in [
                ("small", bands.small),
                ("medium", bands.medium),
                ("large", bands.large),
            ] {
                if !price.is_finite() || price <= 0.0 {
                    return Err(PricingError::Configuration(format!(
                        "{name} {band} band price must be positive, got {price}"
                    )));
                }
            }
            if bands.small > bands.medium || bands.medium > bands.large {
                return Err(PricingError::Configuration(format!(
                    "{name} band prices must not decrease with engine size"
                )));
            }
        }

        if !self.mot_price.is_finite() || self.mot_price <= 0.0 {
            return Err(PricingError::Configuration(format!(
                "MOT price must be positive, got {}",
                self.mot_price
            )));
        }

        for (name, value) in [
            ("diesel_surcharge", self.diesel_surcharge),
            ("hybrid_adjustment", self.hybrid_adjustment),
            ("electric_adjustment", self.electric_adjustment),
        ] {
            if !value.is_finite() {
                return Err(PricingError::Configuration(format!(
                    "{name} must be a finite amount"
                )));
            }
        }

        for (name, discount) in [
            ("interim_combo_discount", self.interim_combo_discount),
            ("full_combo_discount", self.full_combo_discount),
        ] {
            if !discount.is_finite() || discount <= 0.0 {
                return Err(PricingError::Configuration(format!(
                    "{name} must be positive, got {discount}"
                )));
            }
        }

        Ok(())
    }

    pub fn fuel_adjustment(&self, fuel: FuelType) -> f64 {
        match fuel {
            FuelType::Petrol => 0.0,
            FuelType::Diesel => self.diesel_surcharge,
            FuelType::Hybrid => self.hybrid_adjustment,
            FuelType::Electric => self.electric_adjustment,
        }
    }

    /// Quote a single service. Pure function of its inputs: band lookup
    /// plus the fuel adjustment, rounded to 2 decimal places. MOT ignores
    /// engine size and fuel entirely.
    pub fn service_price(&self, service: ServiceType, engine_cc: u32, fuel: FuelType) -> f64 {
        let price = match service {
            ServiceType::Mot => self.mot_price,
            ServiceType::Interim => {
                self.interim.for_band(EngineBand::from_capacity(engine_cc))
                    + self.fuel_adjustment(fuel)
            }
            ServiceType::Full => {
                self.full.for_band(EngineBand::from_capacity(engine_cc))
                    + self.fuel_adjustment(fuel)
            }
        };
        round_pence(price)
    }

    /// Discount applied when the service is booked together with an MOT.
    /// None for MOT itself: there is no MOT + MOT bundle.
    pub fn combo_discount(&self, service: ServiceType) -> Option<f64> {
        match service {
            ServiceType::Interim => Some(self.interim_combo_discount),
            ServiceType::Full => Some(self.full_combo_discount),
            ServiceType::Mot => None,
        }
    }
}

pub fn round_pence(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

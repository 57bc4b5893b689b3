use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Interim,
    Full,
    Mot,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Interim => "interim",
            ServiceType::Full => "full",
            ServiceType::Mot => "mot",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "interim" => Some(ServiceType::Interim),
            "full" => Some(ServiceType::Full),
            "mot" => Some(ServiceType::Mot),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceType::Interim => "Interim Service",
            ServiceType::Full => "Full Service",
            ServiceType::Mot => "MOT Test",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Petrol,
    Diesel,
    Hybrid,
    Electric,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Petrol => "petrol",
            FuelType::Diesel => "diesel",
            FuelType::Hybrid => "hybrid",
            FuelType::Electric => "electric",
        }
    }

    /// Unknown fuel strings fall back to petrol rather than failing, so a
    /// lookup provider returning an unexpected value never blocks a quote.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "diesel" => FuelType::Diesel,
            "hybrid" | "hybrid electric" | "petrol/electric hybrid" => FuelType::Hybrid,
            "electric" | "electricity" => FuelType::Electric,
            _ => FuelType::Petrol,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EngineBand {
    Small,
    Medium,
    Large,
}

impl EngineBand {
    /// Band boundaries: <=1600cc, 1601-2000cc, >2000cc.
    pub fn from_capacity(engine_cc: u32) -> Self {
        if engine_cc <= 1600 {
            EngineBand::Small
        } else if engine_cc <= 2000 {
            EngineBand::Medium
        } else {
            EngineBand::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineBand::Small => "small",
            EngineBand::Medium => "medium",
            EngineBand::Large => "large",
        }
    }
}

use std::env;

pub const DEFAULT_BUSINESS_HOURS: &str = r#"{"days":[
    {"day":"mon","open":"08:30","close":"17:30"},
    {"day":"tue","open":"08:30","close":"17:30"},
    {"day":"wed","open":"08:30","close":"17:30"},
    {"day":"thu","open":"08:30","close":"17:30"},
    {"day":"fri","open":"08:30","close":"17:30"},
    {"day":"sat","open":"09:00","close":"12:30"}
]}"#;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub dves_api_url: String,
    pub dves_api_key: String,
    pub slot_minutes: u32,
    pub vehicle_cache_ttl_secs: u64,
    /// Optional JSON override for the price table; defaults apply when unset.
    pub price_table_json: Option<String>,
    pub default_business_hours: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "garagebook.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            dves_api_url: env::var("DVES_API_URL")
                .unwrap_or_else(|_| "https://driver-vehicle-licensing.api.gov.uk".to_string()),
            dves_api_key: env::var("DVES_API_KEY").unwrap_or_default(),
            slot_minutes: env::var("SLOT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            vehicle_cache_ttl_secs: env::var("VEHICLE_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            price_table_json: env::var("PRICE_TABLE").ok(),
            default_business_hours: env::var("BUSINESS_HOURS")
                .unwrap_or_else(|_| DEFAULT_BUSINESS_HOURS.to_string()),
        }
    }
}

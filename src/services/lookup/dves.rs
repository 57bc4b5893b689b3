use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::VehicleLookupProvider;
use crate::models::{FuelType, Vehicle};

pub struct DvesLookupProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl DvesLookupProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VehicleEnquiryResponse {
    registration_number: String,
    make: Option<String>,
    colour: Option<String>,
    fuel_type: Option<String>,
    engine_capacity: Option<u32>,
    year_of_manufacture: Option<i32>,
    mot_expiry_date: Option<String>,
}

#[async_trait]
impl VehicleLookupProvider for DvesLookupProvider {
    async fn lookup(&self, registration: &str) -> anyhow::Result<Vehicle> {
        let url = format!("{}/vehicle-enquiry/v1/vehicles", self.base_url);

        let response: VehicleEnquiryResponse = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&serde_json::json!({ "registrationNumber": registration }))
            .send()
            .await
            .context("vehicle enquiry request failed")?
            .error_for_status()
            .context("vehicle enquiry API returned error")?
            .json()
            .await
            .context("invalid vehicle enquiry response body")?;

        // Shape is validated here, once. Downstream code takes the Vehicle
        // as well-formed.
        let fuel_type = FuelType::parse(response.fuel_type.as_deref().unwrap_or(""));
        let engine_capacity_cc = response.engine_capacity.unwrap_or(0);
        if engine_capacity_cc == 0 && fuel_type != FuelType::Electric {
            anyhow::bail!(
                "vehicle enquiry response missing engine capacity for {}",
                response.registration_number
            );
        }

        let mot_expiry = response
            .mot_expiry_date
            .as_deref()
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Ok(Vehicle {
            registration: Vehicle::normalise_registration(&response.registration_number),
            engine_capacity_cc,
            fuel_type,
            make: response.make,
            model: None,
            colour: response.colour,
            year: response.year_of_manufacture,
            mot_expiry,
        })
    }
}

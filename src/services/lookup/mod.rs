pub mod dves;

use async_trait::async_trait;

use crate::models::Vehicle;

#[async_trait]
pub trait VehicleLookupProvider: Send + Sync {
    async fn lookup(&self, registration: &str) -> anyhow::Result<Vehicle>;
}

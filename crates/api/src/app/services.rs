use std::sync::Arc;

use stockcast_forecast::MovingAverageForecaster;
use stockcast_infra::{InMemoryProductStore, InventoryService};

use crate::config::ApiConfig;

/// The service every handler shares. State lives for the process lifetime only.
pub type AppServices = InventoryService<InMemoryProductStore, MovingAverageForecaster>;

pub fn build_services(config: &ApiConfig) -> anyhow::Result<Arc<AppServices>> {
    let forecaster = MovingAverageForecaster::new(config.forecast.clone())?;
    Ok(Arc::new(InventoryService::new(
        InMemoryProductStore::new(),
        forecaster,
    )))
}

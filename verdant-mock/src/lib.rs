use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use verdant_core::connector::{EmissionsProvider, ForecastProvider, VerdantConnector};
use verdant_core::{EmissionsData, EmissionsForecast, TimeWindow, VerdantError};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// Mock connector for CI-safe demos. Provides deterministic data computed from fixtures.
///
/// Known locations: `eastus`, `westus`, `uksouth`, `northeurope`, `francecentral`.
/// Samples sit on a 5-minute grid; the location `FAIL` always errors and
/// `TIMEOUT` answers after a short delay.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn not_found(what: &str) -> VerdantError {
        VerdantError::not_found(what.to_string())
    }

    async fn maybe_fail_or_timeout(
        location: &str,
        capability: &'static str,
    ) -> Result<(), VerdantError> {
        match location {
            "FAIL" => Err(VerdantError::connector(
                "verdant-mock",
                format!("forced failure: {capability}"),
            )),
            "TIMEOUT" => {
                // Keep short to avoid slowing tests excessively
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl VerdantConnector for MockConnector {
    fn name(&self) -> &'static str {
        "verdant-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_emissions_provider(&self) -> Option<&dyn EmissionsProvider> {
        Some(self as &dyn EmissionsProvider)
    }

    fn as_forecast_provider(&self) -> Option<&dyn ForecastProvider> {
        Some(self as &dyn ForecastProvider)
    }
}

#[async_trait]
impl EmissionsProvider for MockConnector {
    async fn emissions(
        &self,
        location: &str,
        window: &TimeWindow,
    ) -> Result<Vec<EmissionsData>, VerdantError> {
        Self::maybe_fail_or_timeout(location, "emissions").await?;
        fixtures::emissions::by_location(location, window)?
            .ok_or_else(|| Self::not_found(&format!("emissions for {location}")))
    }

    fn min_sampling_window(&self) -> Option<TimeDelta> {
        Some(fixtures::step())
    }
}

#[async_trait]
impl ForecastProvider for MockConnector {
    async fn current_forecast(&self, location: &str) -> Result<EmissionsForecast, VerdantError> {
        Self::maybe_fail_or_timeout(location, "forecast:current").await?;
        fixtures::forecast::generated_at(location, Utc::now())
            .ok_or_else(|| Self::not_found(&format!("forecast for {location}")))
    }

    async fn forecast_at(
        &self,
        location: &str,
        requested_at: DateTime<Utc>,
    ) -> Result<EmissionsForecast, VerdantError> {
        Self::maybe_fail_or_timeout(location, "forecast:historical").await?;
        fixtures::forecast::generated_at(location, requested_at)
            .ok_or_else(|| Self::not_found(&format!("historical forecast for {location}")))
    }
}

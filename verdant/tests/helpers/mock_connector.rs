#![allow(dead_code)]
#![allow(clippy::type_complexity)]
#![allow(clippy::cast_possible_truncation)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::{Duration, sleep};
use verdant_core::connector::{EmissionsProvider, ForecastProvider, VerdantConnector};
use verdant_core::{EmissionsData, EmissionsForecast, TimeWindow, VerdantError};

type EmissionsFn =
    Arc<dyn Fn(&str, &TimeWindow) -> Result<Vec<EmissionsData>, VerdantError> + Send + Sync>;
type CurrentForecastFn = Arc<dyn Fn(&str) -> Result<EmissionsForecast, VerdantError> + Send + Sync>;
type ForecastAtFn =
    Arc<dyn Fn(&str, DateTime<Utc>) -> Result<EmissionsForecast, VerdantError> + Send + Sync>;

/// Simple in-memory connector used by integration tests.
/// Capabilities are advertised only when the matching closure is set.
pub struct MockConnector {
    pub name: &'static str,
    pub delay_ms: u64,
    pub min_sampling_window: Option<TimeDelta>,
    pub locations: Option<Vec<&'static str>>,
    pub emissions_fn: Option<EmissionsFn>,
    pub current_forecast_fn: Option<CurrentForecastFn>,
    pub forecast_at_fn: Option<ForecastAtFn>,
}

impl MockConnector {
    pub fn builder() -> MockConnectorBuilder {
        MockConnectorBuilder::new()
    }

    async fn pause(&self) {
        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }
}

impl VerdantConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports_location(&self, location: &str) -> bool {
        self.locations
            .as_ref()
            .is_none_or(|ls| ls.iter().any(|l| *l == location))
    }

    fn as_emissions_provider(&self) -> Option<&dyn EmissionsProvider> {
        if self.emissions_fn.is_some() {
            Some(self as &dyn EmissionsProvider)
        } else {
            None
        }
    }

    fn as_forecast_provider(&self) -> Option<&dyn ForecastProvider> {
        if self.current_forecast_fn.is_some() || self.forecast_at_fn.is_some() {
            Some(self as &dyn ForecastProvider)
        } else {
            None
        }
    }
}

#[async_trait]
impl EmissionsProvider for MockConnector {
    async fn emissions(
        &self,
        location: &str,
        window: &TimeWindow,
    ) -> Result<Vec<EmissionsData>, VerdantError> {
        self.pause().await;
        match &self.emissions_fn {
            Some(f) => (f)(location, window),
            None => Err(VerdantError::unsupported("emissions")),
        }
    }

    fn min_sampling_window(&self) -> Option<TimeDelta> {
        self.min_sampling_window
    }
}

#[async_trait]
impl ForecastProvider for MockConnector {
    async fn current_forecast(&self, location: &str) -> Result<EmissionsForecast, VerdantError> {
        self.pause().await;
        match &self.current_forecast_fn {
            Some(f) => (f)(location),
            None => Err(VerdantError::unsupported("forecast:current")),
        }
    }

    async fn forecast_at(
        &self,
        location: &str,
        requested_at: DateTime<Utc>,
    ) -> Result<EmissionsForecast, VerdantError> {
        self.pause().await;
        match &self.forecast_at_fn {
            Some(f) => (f)(location, requested_at),
            None => Err(VerdantError::unsupported("forecast:historical")),
        }
    }
}

pub struct MockConnectorBuilder {
    name: &'static str,
    delay_ms: u64,
    min_sampling_window: Option<TimeDelta>,
    locations: Option<Vec<&'static str>>,
    emissions_fn: Option<EmissionsFn>,
    current_forecast_fn: Option<CurrentForecastFn>,
    forecast_at_fn: Option<ForecastAtFn>,
}

impl MockConnectorBuilder {
    pub fn new() -> Self {
        Self {
            name: "mock",
            delay_ms: 0,
            min_sampling_window: None,
            locations: None,
            emissions_fn: None,
            current_forecast_fn: None,
            forecast_at_fn: None,
        }
    }

    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
    pub fn delay(mut self, d: Duration) -> Self {
        self.delay_ms = d.as_millis() as u64;
        self
    }
    pub fn min_sampling_window(mut self, m: TimeDelta) -> Self {
        self.min_sampling_window = Some(m);
        self
    }
    pub fn supports_locations(mut self, locations: &[&'static str]) -> Self {
        self.locations = Some(locations.to_vec());
        self
    }

    // Emissions
    pub fn with_emissions_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &TimeWindow) -> Result<Vec<EmissionsData>, VerdantError>
            + Send
            + Sync
            + 'static,
    {
        self.emissions_fn = Some(Arc::new(f));
        self
    }
    pub fn returns_emissions_ok(mut self, samples: Vec<EmissionsData>) -> Self {
        self.emissions_fn = Some(Arc::new(move |_l, _w| Ok(samples.clone())));
        self
    }
    pub fn emissions_fail(mut self, err: VerdantError) -> Self {
        self.emissions_fn = Some(Arc::new(move |_l, _w| Err(err.clone())));
        self
    }

    // Forecasts
    pub fn with_current_forecast_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<EmissionsForecast, VerdantError> + Send + Sync + 'static,
    {
        self.current_forecast_fn = Some(Arc::new(f));
        self
    }
    pub fn returns_current_forecast_ok(mut self, raw: EmissionsForecast) -> Self {
        self.current_forecast_fn = Some(Arc::new(move |_l| Ok(raw.clone())));
        self
    }
    pub fn with_forecast_at_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, DateTime<Utc>) -> Result<EmissionsForecast, VerdantError>
            + Send
            + Sync
            + 'static,
    {
        self.forecast_at_fn = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> Arc<MockConnector> {
        Arc::new(MockConnector {
            name: self.name,
            delay_ms: self.delay_ms,
            min_sampling_window: self.min_sampling_window,
            locations: self.locations,
            emissions_fn: self.emissions_fn,
            current_forecast_fn: self.current_forecast_fn,
            forecast_at_fn: self.forecast_at_fn,
        })
    }
}

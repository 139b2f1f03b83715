use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use verdant_core::connector::{EmissionsProvider, ForecastProvider, VerdantConnector};
use verdant_core::{EmissionsData, EmissionsForecast, TimeWindow, VerdantError};

/// Scripted answer for one location.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Answer with this value.
    Return(T),
    /// Answer with this error.
    Fail(VerdantError),
    /// Never answer, so callers hit their timeouts.
    Hang,
}

#[derive(Default)]
struct Rules {
    emissions_rules: HashMap<String, MockBehavior<Vec<EmissionsData>>>,
    forecast_rules: HashMap<String, MockBehavior<EmissionsForecast>>,
    emissions_requests: HashMap<String, Vec<TimeWindow>>,
}

/// Test-side handle that scripts a [`DynamicMockConnector`] and inspects its requests.
pub struct DynamicMockController {
    state: Arc<Mutex<Rules>>,
}

impl DynamicMockController {
    /// Set the behavior for `emissions` calls for a specific location.
    pub async fn set_emissions_behavior(
        &self,
        location: &str,
        behavior: MockBehavior<Vec<EmissionsData>>,
    ) {
        let mut guard = self.state.lock().await;
        guard.emissions_rules.insert(location.to_string(), behavior);
    }

    /// Set the behavior for forecast calls (current and historical) for a specific location.
    pub async fn set_forecast_behavior(
        &self,
        location: &str,
        behavior: MockBehavior<EmissionsForecast>,
    ) {
        let mut guard = self.state.lock().await;
        guard.forecast_rules.insert(location.to_string(), behavior);
    }

    /// Windows requested via `emissions` for `location`, in call order.
    pub async fn get_emissions_requests(&self, location: &str) -> Vec<TimeWindow> {
        let guard = self.state.lock().await;
        guard
            .emissions_requests
            .get(location)
            .cloned()
            .unwrap_or_default()
    }

    /// Forget every scripted answer and recorded request.
    pub async fn clear_all_behaviors(&self) {
        let mut state = self.state.lock().await;
        state.emissions_rules.clear();
        state.forecast_rules.clear();
        state.emissions_requests.clear();
    }
}

/// Connector whose answers are scripted per location through a [`DynamicMockController`].
///
/// Unscripted locations answer `NotFound`.
pub struct DynamicMockConnector {
    name: &'static str,
    min_sampling_window: Option<TimeDelta>,
    state: Arc<Mutex<Rules>>,
}

impl DynamicMockConnector {
    /// Connector named `name` without a minimum sampling window, plus its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn VerdantConnector>, DynamicMockController) {
        Self::with_min_sampling_window(name, None)
    }

    /// Like [`new_with_controller`](Self::new_with_controller), advertising
    /// `min_sampling_window` so the orchestrator pads requests.
    #[must_use]
    pub fn with_min_sampling_window(
        name: &'static str,
        min_sampling_window: Option<TimeDelta>,
    ) -> (Arc<dyn VerdantConnector>, DynamicMockController) {
        let shared = Arc::new(Mutex::new(Rules::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&shared),
        };
        let me = Arc::new(Self {
            name,
            min_sampling_window,
            state: shared,
        });
        (me as Arc<dyn VerdantConnector>, controller)
    }

    async fn forecast_behavior(&self, location: &str) -> Result<EmissionsForecast, VerdantError> {
        let behavior = {
            let guard = self.state.lock().await;
            guard.forecast_rules.get(location).cloned()
        };

        match behavior {
            Some(MockBehavior::Return(f)) => Ok(f),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Err(VerdantError::not_found(format!("forecast for {location}"))),
        }
    }
}

impl VerdantConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_emissions_provider(&self) -> Option<&dyn EmissionsProvider> {
        Some(self as &dyn EmissionsProvider)
    }

    fn as_forecast_provider(&self) -> Option<&dyn ForecastProvider> {
        Some(self as &dyn ForecastProvider)
    }
}

#[async_trait]
impl EmissionsProvider for DynamicMockConnector {
    async fn emissions(
        &self,
        location: &str,
        window: &TimeWindow,
    ) -> Result<Vec<EmissionsData>, VerdantError> {
        // Lock is released before the scripted answer runs
        let behavior = {
            let mut guard = self.state.lock().await;
            guard
                .emissions_requests
                .entry(location.to_string())
                .or_default()
                .push(*window);
            guard.emissions_rules.get(location).cloned()
        };

        match behavior {
            Some(MockBehavior::Return(samples)) => Ok(samples),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Err(VerdantError::not_found(format!("emissions for {location}"))),
        }
    }

    fn min_sampling_window(&self) -> Option<TimeDelta> {
        self.min_sampling_window
    }
}

#[async_trait]
impl ForecastProvider for DynamicMockConnector {
    async fn current_forecast(&self, location: &str) -> Result<EmissionsForecast, VerdantError> {
        self.forecast_behavior(location).await
    }

    async fn forecast_at(
        &self,
        location: &str,
        requested_at: DateTime<Utc>,
    ) -> Result<EmissionsForecast, VerdantError> {
        let _ = requested_at;
        self.forecast_behavior(location).await
    }
}

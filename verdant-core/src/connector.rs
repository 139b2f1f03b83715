use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

pub use verdant_types::ConnectorKey;

use crate::{Capability, EmissionsData, EmissionsForecast, TimeWindow, VerdantError};

/// Focused role trait for connectors that provide observed carbon-intensity samples.
#[async_trait]
pub trait EmissionsProvider: Send + Sync {
    /// Fetch samples for `location` overlapping `window`, ordered by `time`.
    ///
    /// Implementations may return samples that extend past the window bounds;
    /// callers trim them.
    async fn emissions(
        &self,
        location: &str,
        window: &TimeWindow,
    ) -> Result<Vec<EmissionsData>, VerdantError>;

    /// Smallest window this provider can usefully answer for.
    ///
    /// When present, shorter requests are padded before `emissions` is called
    /// and the result is trimmed back afterwards. Default: `None` (no padding).
    fn min_sampling_window(&self) -> Option<TimeDelta> {
        None
    }
}

/// Focused role trait for connectors that provide carbon-intensity forecasts.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Fetch the most recent forecast for `location`, unprocessed.
    async fn current_forecast(&self, location: &str) -> Result<EmissionsForecast, VerdantError>;

    /// Fetch the forecast that was current at `requested_at`.
    ///
    /// Default: returns `Unsupported`. Override when the upstream keeps
    /// forecast history.
    async fn forecast_at(
        &self,
        location: &str,
        requested_at: DateTime<Utc>,
    ) -> Result<EmissionsForecast, VerdantError> {
        let _ = (location, requested_at);
        Err(VerdantError::unsupported(Capability::HistoricalForecast.as_str()))
    }
}

/// Primary connector trait implemented by every data source.
///
/// Capabilities are advertised through the `as_*_provider` accessors; the
/// orchestrator only routes a request to connectors that return `Some`.
pub trait VerdantConnector: Send + Sync {
    /// A stable identifier for priority lists (e.g., "verdant-mock", "verdant-watttime").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    ///
    /// Use this helper when configuring per-location priorities.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Whether this connector *claims* to serve data for `location`.
    ///
    /// Default: `true`. Regional providers should override this so the
    /// orchestrator skips them for locations they cannot answer.
    fn supports_location(&self, location: &str) -> bool {
        let _ = location;
        true
    }

    /// Advertise emissions capability by returning a usable trait object reference when supported.
    fn as_emissions_provider(&self) -> Option<&dyn EmissionsProvider> {
        None
    }

    /// Advertise forecast capability by returning a usable trait object reference when supported.
    fn as_forecast_provider(&self) -> Option<&dyn ForecastProvider> {
        None
    }
}

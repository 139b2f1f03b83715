//! Forecast envelopes and caller parameters.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::emissions::EmissionsData;

/// A provider forecast for one location, before or after resampling.
///
/// Providers fill `generated_at`, `location`, and the raw `forecast_data`; the
/// remaining fields are resolved by the forecast pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsForecast {
    /// Location the forecast refers to.
    pub location: String,
    /// Instant the caller asked the forecast "as of".
    pub requested_at: DateTime<Utc>,
    /// Instant the provider generated the forecast.
    pub generated_at: DateTime<Utc>,
    /// Start of the scoped data window.
    pub data_start_at: DateTime<Utc>,
    /// End of the scoped data window (exclusive).
    pub data_end_at: DateTime<Utc>,
    /// Granularity of `forecast_data` after resampling.
    #[serde(with = "crate::serde_duration::seconds")]
    pub window_size: TimeDelta,
    /// Forecast samples, ordered by time.
    pub forecast_data: Vec<EmissionsData>,
    /// Lowest-rated sample in `forecast_data`, if any.
    pub optimal_data_point: Option<EmissionsData>,
}

impl EmissionsForecast {
    /// Build a raw forecast as a provider would return it.
    ///
    /// Scope fields default to the span of `forecast_data` (or `generated_at`
    /// when empty) and `window_size` to the first sample's duration.
    pub fn raw(
        location: impl Into<String>,
        generated_at: DateTime<Utc>,
        forecast_data: Vec<EmissionsData>,
    ) -> Self {
        let data_start_at = forecast_data.first().map_or(generated_at, |s| s.time);
        let data_end_at = forecast_data.last().map_or(generated_at, EmissionsData::end);
        let window_size = forecast_data
            .first()
            .map_or_else(TimeDelta::zero, |s| s.duration);
        Self {
            location: location.into(),
            requested_at: generated_at,
            generated_at,
            data_start_at,
            data_end_at,
            window_size,
            forecast_data,
            optimal_data_point: None,
        }
    }
}

/// Caller-supplied forecast parameters; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastParams {
    /// Start of the scoped window; defaults to the first sample's time.
    pub data_start_at: Option<DateTime<Utc>>,
    /// End of the scoped window; defaults to the last sample's end.
    pub data_end_at: Option<DateTime<Utc>>,
    /// Rolling-average window size; absent or zero keeps native granularity.
    #[serde(default, with = "crate::serde_duration::option_seconds")]
    pub window_size: Option<TimeDelta>,
    /// "As of" instant; defaults to the current time.
    pub requested_at: Option<DateTime<Utc>>,
}

impl ForecastParams {
    /// Parameters with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scoped data window start.
    #[must_use]
    pub const fn data_start_at(mut self, ts: DateTime<Utc>) -> Self {
        self.data_start_at = Some(ts);
        self
    }

    /// Set the scoped data window end.
    #[must_use]
    pub const fn data_end_at(mut self, ts: DateTime<Utc>) -> Self {
        self.data_end_at = Some(ts);
        self
    }

    /// Set the rolling-average window size.
    #[must_use]
    pub const fn window_size(mut self, size: TimeDelta) -> Self {
        self.window_size = Some(size);
        self
    }

    /// Set the "as of" instant.
    #[must_use]
    pub const fn requested_at(mut self, ts: DateTime<Utc>) -> Self {
        self.requested_at = Some(ts);
        self
    }
}

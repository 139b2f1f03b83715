use core::fmt;
use serde::{Deserialize, Serialize};

/// High-level capability labels for routing, errors, and telemetry.
///
/// These map one-to-one with orchestrator operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Observed emissions over a window.
    Emissions,
    /// Lowest-rated observed emissions over a window.
    BestEmissions,
    /// Duration-weighted average intensity over a window.
    AverageIntensity,
    /// Latest forecast for a location.
    CurrentForecast,
    /// Forecast as it stood at a past instant.
    HistoricalForecast,
}

impl Capability {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emissions => "emissions",
            Self::BestEmissions => "emissions:best",
            Self::AverageIntensity => "average-intensity",
            Self::CurrentForecast => "forecast:current",
            Self::HistoricalForecast => "forecast:historical",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Emissions samples and requested time windows.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VerdantError;

/// One observed or forecasted carbon-intensity reading over `[time, time + duration)`.
///
/// `rating` is typically grams CO2-equivalent per kWh. No sign constraint is
/// enforced; negative and zero ratings are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsData {
    /// Opaque location identifier reported by the provider.
    pub location: String,
    /// Instant at which the sample's interval begins.
    pub time: DateTime<Utc>,
    /// Length of the sample's interval.
    #[serde(with = "crate::serde_duration::seconds")]
    pub duration: TimeDelta,
    /// Intensity rating over the interval.
    pub rating: f64,
}

impl EmissionsData {
    /// Construct a sample.
    pub fn new(
        location: impl Into<String>,
        time: DateTime<Utc>,
        duration: TimeDelta,
        rating: f64,
    ) -> Self {
        Self {
            location: location.into(),
            time,
            duration,
            rating,
        }
    }

    /// Exclusive end instant of the sample's interval.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.time + self.duration
    }

    /// Length of the intersection between this sample and `[start, end)`.
    ///
    /// Returns `TimeDelta::zero()` when the two intervals do not intersect.
    #[must_use]
    pub fn overlap(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> TimeDelta {
        let lo = start.max(self.time);
        let hi = end.min(self.end());
        if hi > lo { hi - lo } else { TimeDelta::zero() }
    }
}

/// A half-open requested time range `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow", into = "RawWindow")]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Build a window, rejecting empty or inverted ranges.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `start >= end`.
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, VerdantError> {
        if start >= end {
            return Err(VerdantError::invalid_arg(format!(
                "window start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a window of `span` starting at `start`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `span` is not positive or the end overflows.
    pub fn starting_at(start: DateTime<Utc>, span: TimeDelta) -> Result<Self, VerdantError> {
        let end = start
            .checked_add_signed(span)
            .ok_or_else(|| VerdantError::invalid_arg("window end out of range"))?;
        Self::try_new(start, end)
    }

    /// Inclusive start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Window length; always positive.
    #[must_use]
    pub fn span(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether `ts` lies in `[start, end)`.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }
}

#[derive(Serialize, Deserialize)]
struct RawWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawWindow> for TimeWindow {
    type Error = VerdantError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::try_new(raw.start, raw.end)
    }
}

impl From<TimeWindow> for RawWindow {
    fn from(w: TimeWindow) -> Self {
        Self {
            start: w.start,
            end: w.end,
        }
    }
}

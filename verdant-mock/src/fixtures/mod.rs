pub mod emissions;
pub mod forecast;

use chrono::{DateTime, TimeDelta, Utc};

/// Fixture sampling granularity in seconds.
pub const STEP_SECS: i64 = 300;

/// Longest window a fixture query will materialize (31 days of 5-minute samples).
pub const MAX_SAMPLES: i64 = 31 * 24 * 12;

pub fn step() -> TimeDelta {
    TimeDelta::seconds(STEP_SECS)
}

/// Baseline intensity (gCO2/kWh) for the locations the mock knows about.
pub fn baseline(location: &str) -> Option<f64> {
    match location {
        "eastus" => Some(420.0),
        "westus" => Some(260.0),
        "uksouth" => Some(220.0),
        "northeurope" => Some(180.0),
        "francecentral" => Some(60.0),
        _ => None,
    }
}

/// Deterministic rating for the 5-minute slot starting at `slot * STEP_SECS`.
///
/// A V-shaped two-hour cycle around the location baseline; the phase is
/// shifted per location so different regions bottom out at different times.
#[allow(clippy::cast_precision_loss)]
pub fn rating_at(location: &str, slot: i64) -> Option<f64> {
    let base = baseline(location)?;
    let phase = i64::try_from(location.len()).unwrap_or(0) * 3;
    let pos = (slot + phase).rem_euclid(24);
    Some(base + 5.0 * (pos - 12).abs() as f64)
}

pub fn slot_start(slot: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(slot.checked_mul(STEP_SECS)?, 0)
}

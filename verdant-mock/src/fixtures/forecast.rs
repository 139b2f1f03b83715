use chrono::{DateTime, Utc};
use verdant_core::{EmissionsData, EmissionsForecast};

use super::{STEP_SECS, rating_at, slot_start, step};

/// Forecast horizon in 5-minute steps (24 hours).
pub const HORIZON: i64 = 24 * 12;

/// A raw forecast generated at `generated_at`, floored to the 5-minute grid,
/// covering the next 24 hours.
///
/// Returns `None` for unknown locations.
pub fn generated_at(location: &str, generated_at: DateTime<Utc>) -> Option<EmissionsForecast> {
    rating_at(location, 0)?;
    let first = generated_at.timestamp().div_euclid(STEP_SECS);
    let issued = slot_start(first)?;
    let data: Vec<EmissionsData> = (first..first + HORIZON)
        .filter_map(|slot| {
            let time = slot_start(slot)?;
            Some(EmissionsData::new(location, time, step(), rating_at(location, slot)?))
        })
        .collect();
    Some(EmissionsForecast::raw(location, issued, data))
}

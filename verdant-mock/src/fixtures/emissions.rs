use verdant_core::{EmissionsData, TimeWindow, VerdantError};

use super::{MAX_SAMPLES, STEP_SECS, rating_at, slot_start, step};

/// Observed samples on the 5-minute grid overlapping `window`.
///
/// Returns `Ok(None)` for unknown locations.
pub fn by_location(
    location: &str,
    window: &TimeWindow,
) -> Result<Option<Vec<EmissionsData>>, VerdantError> {
    if rating_at(location, 0).is_none() {
        return Ok(None);
    }
    let first = window.start().timestamp().div_euclid(STEP_SECS);
    let last = (window.end().timestamp() + STEP_SECS - 1).div_euclid(STEP_SECS);
    if last - first > MAX_SAMPLES {
        return Err(VerdantError::invalid_arg(format!(
            "mock serves at most {MAX_SAMPLES} samples per request"
        )));
    }

    let samples = (first..last)
        .filter_map(|slot| {
            let time = slot_start(slot)?;
            let rating = rating_at(location, slot)?;
            Some(EmissionsData::new(location, time, step(), rating))
        })
        .collect();
    Ok(Some(samples))
}

use std::borrow::Borrow;

use chrono::TimeDelta;

use crate::timeseries::filter::{FilterByDuration, filter_by_duration};
use crate::{EmissionsData, TimeWindow, VerdantError};

/// Widen `requested` so a provider with a minimum usable sampling granularity
/// returns at least one full sample covering it.
///
/// Policy: when the requested span is shorter than `min_sampling_window`, both
/// bounds move outward by exactly `min_sampling_window`. Wider requests are
/// returned unchanged. The padded window always contains `requested`.
///
/// Pair with [`trim_to_window`] on the fetched samples to discard the padding.
///
/// # Errors
/// Returns `InvalidArg` if `min_sampling_window` is not positive or the padded
/// bounds fall outside the representable instant range.
///
/// ```
/// use chrono::{DateTime, TimeDelta, Utc};
/// use verdant_core::{TimeWindow, pad_window};
///
/// let t = |s: i64| DateTime::<Utc>::from_timestamp(s, 0).unwrap();
/// let req = TimeWindow::try_new(t(600), t(660)).unwrap();
/// let padded = pad_window(&req, TimeDelta::minutes(5)).unwrap();
/// assert_eq!((padded.start(), padded.end()), (t(300), t(960)));
///
/// let wide = TimeWindow::try_new(t(0), t(3600)).unwrap();
/// assert_eq!(pad_window(&wide, TimeDelta::minutes(5)).unwrap(), wide);
/// ```
pub fn pad_window(
    requested: &TimeWindow,
    min_sampling_window: TimeDelta,
) -> Result<TimeWindow, VerdantError> {
    if min_sampling_window <= TimeDelta::zero() {
        return Err(VerdantError::invalid_arg(format!(
            "minimum sampling window must be > 0, got {min_sampling_window}"
        )));
    }
    if requested.span() >= min_sampling_window {
        return Ok(*requested);
    }

    let start = requested
        .start()
        .checked_sub_signed(min_sampling_window)
        .ok_or_else(|| VerdantError::invalid_arg("padded window start out of range"))?;
    let end = requested
        .end()
        .checked_add_signed(min_sampling_window)
        .ok_or_else(|| VerdantError::invalid_arg("padded window end out of range"))?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        requested_start = %requested.start(),
        requested_end = %requested.end(),
        padded_start = %start,
        padded_end = %end,
        "padded request to minimum sampling window"
    );

    TimeWindow::try_new(start, end)
}

/// Discard samples fetched for a padded window that do not overlap the
/// originally `requested` window.
///
/// This is [`filter_by_duration`] under the name used at fetch call sites.
pub fn trim_to_window<I>(samples: I, requested: &TimeWindow) -> FilterByDuration<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Borrow<EmissionsData>,
{
    filter_by_duration(samples, requested)
}

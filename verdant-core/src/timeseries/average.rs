use std::borrow::Borrow;

use crate::timeseries::filter::filter_by_duration;
use crate::timeseries::resample::seconds;
use crate::{EmissionsData, TimeWindow};

/// Overlap-weighted mean rating of the samples intersecting `window`.
///
/// Each sample contributes `rating · overlap`, and the sum is divided by the
/// total overlap rather than the window length, so gaps in coverage do not
/// drag the mean toward zero. Returns `None` when no sample has a positive
/// overlap with `window`.
///
/// ```
/// use chrono::{DateTime, TimeDelta, Utc};
/// use verdant_core::{EmissionsData, TimeWindow, average_intensity};
///
/// let t = |s: i64| DateTime::<Utc>::from_timestamp(s, 0).unwrap();
/// let hour = TimeDelta::hours(1);
/// let samples = vec![
///     EmissionsData::new("eastus", t(0), hour, 100.0),
///     EmissionsData::new("eastus", t(3600), hour, 200.0),
/// ];
/// // 30 minutes at 100 and 60 minutes at 200.
/// let w = TimeWindow::try_new(t(1800), t(7200)).unwrap();
/// let avg = average_intensity(&samples, &w).unwrap();
/// assert!((avg - 500.0 / 3.0).abs() < 1e-9);
/// ```
pub fn average_intensity<I>(samples: I, window: &TimeWindow) -> Option<f64>
where
    I: IntoIterator,
    I::Item: Borrow<EmissionsData>,
{
    let (weighted, total) = filter_by_duration(samples, window).fold(
        (0.0_f64, 0.0_f64),
        |(weighted, total), s| {
            let s = s.borrow();
            let secs = seconds(s.overlap(window.start(), window.end()));
            (weighted + s.rating * secs, total + secs)
        },
    );
    (total > 0.0).then(|| weighted / total)
}

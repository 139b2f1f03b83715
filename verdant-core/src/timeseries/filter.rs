use std::borrow::Borrow;
use std::iter::FusedIterator;

use chrono::{DateTime, Utc};

use crate::{EmissionsData, TimeWindow};

/// Lazy adapter returned by [`filter_by_duration`].
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct FilterByDuration<I> {
    inner: I,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl<I> FilterByDuration<I> {
    fn keeps(&self, s: &EmissionsData) -> bool {
        if s.duration.is_zero() {
            return self.start <= s.time && s.time < self.end;
        }
        s.time < self.end && s.end() > self.start
    }
}

impl<I> Iterator for FilterByDuration<I>
where
    I: Iterator,
    I::Item: Borrow<EmissionsData>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.inner.next()?;
            if self.keeps(item.borrow()) {
                return Some(item);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<I> FusedIterator for FilterByDuration<I>
where
    I: FusedIterator,
    I::Item: Borrow<EmissionsData>,
{
}

/// Keep exactly the samples whose interval `[time, time + duration)` overlaps `window`.
///
/// - A sample is retained iff `time < window.end` and `time + duration > window.start`.
/// - Zero-duration samples are retained only if `time` lies in `[window.start, window.end)`.
/// - Input order is preserved; nothing is clipped, reordered, or de-duplicated.
///   A sample straddling a bound is kept whole.
///
/// Works over owned samples or references. Calling it again on the same
/// (cloneable) source restarts the sequence.
///
/// ```
/// use chrono::{DateTime, TimeDelta, Utc};
/// use verdant_core::{EmissionsData, TimeWindow, filter_by_duration};
///
/// let t = |s: i64| DateTime::<Utc>::from_timestamp(s, 0).unwrap();
/// let five = TimeDelta::minutes(5);
/// let samples = vec![
///     EmissionsData::new("eastus", t(0), five, 10.0),
///     EmissionsData::new("eastus", t(300), five, 20.0),
///     EmissionsData::new("eastus", t(600), five, 30.0),
/// ];
/// // Only the middle sample overlaps [420s, 600s); the last one starts at the end bound.
/// let w = TimeWindow::try_new(t(420), t(600)).unwrap();
/// let kept: Vec<f64> = filter_by_duration(&samples, &w).map(|s| s.rating).collect();
/// assert_eq!(kept, vec![20.0]);
/// ```
pub fn filter_by_duration<I>(samples: I, window: &TimeWindow) -> FilterByDuration<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Borrow<EmissionsData>,
{
    FilterByDuration {
        inner: samples.into_iter(),
        start: window.start(),
        end: window.end(),
    }
}

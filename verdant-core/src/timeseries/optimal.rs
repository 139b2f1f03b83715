use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::EmissionsData;

/// Return the first sample carrying the minimum rating, or `None` for empty input.
///
/// Ties resolve to the earliest-encountered sample. Ratings are ordered with
/// [`f64::total_cmp`].
///
/// Used by the forecast pipeline to report a single optimal data point.
pub fn select_optimal<I>(samples: I) -> Option<I::Item>
where
    I: IntoIterator,
    I::Item: Borrow<EmissionsData>,
{
    samples.into_iter().reduce(|best, s| {
        if s.borrow().rating.total_cmp(&best.borrow().rating) == Ordering::Less {
            s
        } else {
            best
        }
    })
}

/// Return every sample tied for the minimum rating, in input order.
///
/// Empty input yields an empty vector. Ratings are ordered with
/// [`f64::total_cmp`].
///
/// Used by the best-emissions query, which reports all equally good
/// locations and times rather than an arbitrary one.
pub fn select_all_optimal<I>(samples: I) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: Borrow<EmissionsData>,
{
    let mut best: Vec<I::Item> = Vec::new();
    for s in samples {
        let ord = best
            .first()
            .map(|b| s.borrow().rating.total_cmp(&b.borrow().rating));
        match ord {
            None | Some(Ordering::Equal) => best.push(s),
            Some(Ordering::Less) => {
                best.clear();
                best.push(s);
            }
            Some(Ordering::Greater) => {}
        }
    }
    best
}

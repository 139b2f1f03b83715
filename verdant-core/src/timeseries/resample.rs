use std::borrow::Borrow;
use std::collections::VecDeque;
use std::iter::{FusedIterator, Peekable};

use chrono::{DateTime, TimeDelta, Utc};

use crate::{EmissionsData, VerdantError};

/// Duration-weighted average of `samples` over `[start, end)`.
///
/// - `location` is taken from the first sample; further locations are ignored.
/// - `duration` is `end - start`.
/// - `rating` is `Σ rating · overlap / (end - start)` over every sample that
///   intersects the period. Samples outside the period contribute nothing.
///
/// The result is exact for piecewise-constant ratings when the samples cover
/// the whole period; partially covered periods are under-weighted, which is
/// why [`RollingAverage`] only calls this on fully covered windows.
///
/// Returns `None` when `samples` is empty or `end <= start`.
pub fn average_over_period<I>(
    samples: I,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Option<EmissionsData>
where
    I: IntoIterator,
    I::Item: Borrow<EmissionsData>,
{
    if end <= start {
        return None;
    }
    let mut iter = samples.into_iter().peekable();
    let location = iter.peek()?.borrow().location.clone();
    let span = end - start;

    let weighted: f64 = iter
        .map(|s| {
            let s = s.borrow();
            s.rating * seconds(s.overlap(start, end))
        })
        .sum();

    Some(EmissionsData {
        location,
        time: start,
        duration: span,
        rating: weighted / seconds(span),
    })
}

/// Fractional seconds at nanosecond resolution.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn seconds(d: TimeDelta) -> f64 {
    d.num_seconds() as f64 + f64::from(d.subsec_nanos()) * 1e-9
}

/// Lazy, single-pass resampler returned by [`rolling_average`].
///
/// Holds a FIFO of the samples relevant to the current window and a peekable
/// fill cursor over the input; each input sample is enqueued and evicted at
/// most once. Not restartable once partially consumed.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct RollingAverage<I: Iterator> {
    state: State<I>,
}

enum State<I: Iterator> {
    Empty,
    PassThrough(Peekable<I>),
    Windowed(Windowed<I>),
}

struct Windowed<I: Iterator> {
    source: Peekable<I>,
    queue: VecDeque<EmissionsData>,
    last_end: Option<DateTime<Utc>>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    window_size: TimeDelta,
    tick: TimeDelta,
    finished: bool,
}

impl<I> Windowed<I>
where
    I: Iterator<Item = EmissionsData>,
{
    fn fill(&mut self) {
        let window_end = self.window_end;
        while let Some(s) = self.source.next_if(|s| s.time < window_end) {
            self.last_end = Some(s.end());
            self.queue.push_back(s);
        }
    }

    /// True when the queued samples cover `[window_start, window_end)` without a hole.
    fn covers_window(&self) -> bool {
        if !self.last_end.is_some_and(|end| end >= self.window_end) {
            return false;
        }
        let mut reached = self.window_start;
        for s in &self.queue {
            if s.duration <= TimeDelta::zero() || s.end() <= reached {
                continue;
            }
            if s.time > reached {
                return false;
            }
            reached = s.end();
            if reached >= self.window_end {
                return true;
            }
        }
        false
    }

    /// Move the window forward one tick. Returns `false` if the bounds overflow.
    fn advance(&mut self) -> bool {
        let Some(start) = self.window_start.checked_add_signed(self.tick) else {
            return false;
        };
        let Some(end) = start.checked_add_signed(self.window_size) else {
            return false;
        };
        self.window_start = start;
        self.window_end = end;
        true
    }

    fn evict(&mut self) {
        while self
            .queue
            .front()
            .is_some_and(|s| s.end() < self.window_start)
        {
            self.queue.pop_front();
        }
    }

    fn next_window(&mut self) -> Option<EmissionsData> {
        while !self.finished {
            self.fill();

            let emitted = if self.covers_window() {
                average_over_period(&self.queue, self.window_start, self.window_end)
            } else {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    window_start = %self.window_start,
                    window_end = %self.window_end,
                    "skipping incompletely covered window"
                );
                None
            };

            if self.advance() {
                self.evict();
                let exhausted = self.source.peek().is_none();
                let reaches = self.last_end.is_some_and(|end| end >= self.window_end);
                self.finished = exhausted && !reaches;
            } else {
                self.finished = true;
            }

            if emitted.is_some() {
                return emitted;
            }
        }
        None
    }
}

impl<I> Iterator for RollingAverage<I>
where
    I: Iterator<Item = EmissionsData>,
{
    type Item = EmissionsData;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            State::Empty => None,
            State::PassThrough(source) => source.next(),
            State::Windowed(w) => w.next_window(),
        }
    }
}

impl<I> FusedIterator for RollingAverage<I> where I: FusedIterator<Item = EmissionsData> {}

/// Resample a time-ordered series into fixed-size windows advancing by a fixed tick.
///
/// Each output sample starts at a window start, has `duration == window_size`,
/// and carries the duration-weighted average of every input sample that
/// intersects the window (see [`average_over_period`]).
///
/// Rules:
/// - Empty input yields an empty sequence.
/// - `window_size` absent or zero yields the input unchanged.
/// - `tick_size` defaults to the first sample's duration.
/// - The first window starts at the first sample's time.
/// - A window that is not fully covered by input (a gap, or the tail of the
///   series) produces no output for that tick; later covered windows still do.
///
/// Input must be in non-decreasing order by `time`; it is never sorted here.
///
/// # Errors
/// Returns `InvalidArg` before producing any output when `window_size` or
/// `tick_size` is negative, or when the effective tick size is zero.
///
/// ```
/// use chrono::{DateTime, TimeDelta, Utc};
/// use verdant_core::{EmissionsData, rolling_average};
///
/// let t = |s: i64| DateTime::<Utc>::from_timestamp(s, 0).unwrap();
/// let half_hour = TimeDelta::minutes(30);
/// let samples = vec![
///     EmissionsData::new("eastus", t(0), half_hour, 50.0),
///     EmissionsData::new("eastus", t(1800), half_hour, 100.0),
///     EmissionsData::new("eastus", t(3600), half_hour, 150.0),
/// ];
/// let out: Vec<EmissionsData> = rolling_average(samples, Some(TimeDelta::minutes(60)), None)
///     .unwrap()
///     .collect();
/// // [0, 60m) and [30m, 90m); the window at 60m would run past the data.
/// assert_eq!(out.len(), 2);
/// assert_eq!(out[0].rating, 75.0);
/// assert_eq!(out[1].rating, 125.0);
/// ```
pub fn rolling_average<I>(
    samples: I,
    window_size: Option<TimeDelta>,
    tick_size: Option<TimeDelta>,
) -> Result<RollingAverage<I::IntoIter>, VerdantError>
where
    I: IntoIterator<Item = EmissionsData>,
{
    let mut source = samples.into_iter().peekable();
    let Some((first_time, first_duration)) = source.peek().map(|s| (s.time, s.duration)) else {
        return Ok(RollingAverage {
            state: State::Empty,
        });
    };

    let window_size = match window_size {
        None => {
            return Ok(RollingAverage {
                state: State::PassThrough(source),
            });
        }
        Some(w) if w < TimeDelta::zero() => {
            return Err(VerdantError::invalid_arg(format!(
                "window size must be >= 0, got {w}"
            )));
        }
        Some(w) if w.is_zero() => {
            return Ok(RollingAverage {
                state: State::PassThrough(source),
            });
        }
        Some(w) => w,
    };

    let tick = tick_size.unwrap_or(first_duration);
    if tick <= TimeDelta::zero() {
        return Err(VerdantError::invalid_arg(format!(
            "tick size must be > 0, got {tick}"
        )));
    }

    let window_start = first_time;
    let window_end = window_start
        .checked_add_signed(window_size)
        .ok_or_else(|| VerdantError::invalid_arg("first window end out of range"))?;

    Ok(RollingAverage {
        state: State::Windowed(Windowed {
            source,
            queue: VecDeque::new(),
            last_end: None,
            window_start,
            window_end,
            window_size,
            tick,
            finished: false,
        }),
    })
}

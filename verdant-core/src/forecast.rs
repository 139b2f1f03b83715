use chrono::{DateTime, TimeDelta, Utc};

use crate::timeseries::filter::filter_by_duration;
use crate::timeseries::optimal::select_optimal;
use crate::timeseries::resample::rolling_average;
use crate::{EmissionsData, EmissionsForecast, ForecastParams, TimeWindow, VerdantError};

/// Scope, resample, and annotate a raw provider forecast.
///
/// Steps, strictly in order:
/// 1. Resolve `data_start_at` (caller value, else the first sample's time),
///    `data_end_at` (caller value, else the last sample's end) and
///    `requested_at` (caller value, else `now`).
/// 2. Validate the scope.
/// 3. Keep only samples overlapping `[data_start_at, data_end_at)`.
/// 4. Resample with `params.window_size`, ticking at the first filtered
///    sample's duration. Absent or zero window size keeps the filtered
///    samples unchanged.
/// 5. Pick the single lowest-rated sample as `optimal_data_point`.
/// 6. Report `window_size` as the duration of the first resampled sample, so
///    callers see the granularity actually produced.
///
/// A raw forecast without samples is not an error: the result is empty, its
/// bounds fall back to the caller's values and then to `requested_at`. Caller
/// bounds are still checked for order.
///
/// # Errors
/// Returns `InvalidArg` when `params.window_size` is negative, when
/// `data_start_at >= data_end_at`, when the scope reaches outside the raw
/// data's `[first.time, last.end)` span, or when a window size is requested
/// and the first filtered sample has zero duration.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "verdant_core::forecast::process_forecast",
        skip(raw, params),
        fields(location = %raw.location, samples = raw.forecast_data.len()),
    )
)]
pub fn process_forecast(
    raw: EmissionsForecast,
    params: &ForecastParams,
    now: DateTime<Utc>,
) -> Result<EmissionsForecast, VerdantError> {
    let requested_at = params.requested_at.unwrap_or(now);
    if let Some(w) = params.window_size
        && w < TimeDelta::zero()
    {
        return Err(VerdantError::invalid_arg(format!(
            "window size must be >= 0, got {w}"
        )));
    }

    let (Some(first), Some(last)) = (raw.forecast_data.first(), raw.forecast_data.last()) else {
        if let (Some(start), Some(end)) = (params.data_start_at, params.data_end_at) {
            check_order(start, end)?;
        }
        return Ok(EmissionsForecast {
            requested_at,
            data_start_at: params.data_start_at.unwrap_or(requested_at),
            data_end_at: params.data_end_at.unwrap_or(requested_at),
            window_size: params.window_size.unwrap_or_else(TimeDelta::zero),
            forecast_data: Vec::new(),
            optimal_data_point: None,
            ..raw
        });
    };

    let (span_start, span_end) = (first.time, last.end());
    let data_start_at = params.data_start_at.unwrap_or(span_start);
    let data_end_at = params.data_end_at.unwrap_or(span_end);
    let scope = validate_scope(data_start_at, data_end_at, span_start, span_end)?;

    let filtered: Vec<EmissionsData> = filter_by_duration(raw.forecast_data, &scope).collect();
    let forecast_data: Vec<EmissionsData> =
        rolling_average(filtered, params.window_size, None)?.collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        resampled = forecast_data.len(),
        window_size = ?params.window_size,
        "resampled forecast"
    );

    let optimal_data_point = select_optimal(&forecast_data).cloned();
    let window_size = forecast_data.first().map_or_else(
        || params.window_size.unwrap_or_else(TimeDelta::zero),
        |s| s.duration,
    );

    Ok(EmissionsForecast {
        location: raw.location,
        requested_at,
        generated_at: raw.generated_at,
        data_start_at,
        data_end_at,
        window_size,
        forecast_data,
        optimal_data_point,
    })
}

fn check_order(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), VerdantError> {
    if start >= end {
        return Err(VerdantError::invalid_arg(format!(
            "data_start_at ({start}) must be before data_end_at ({end})"
        )));
    }
    Ok(())
}

fn validate_scope(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    span_start: DateTime<Utc>,
    span_end: DateTime<Utc>,
) -> Result<TimeWindow, VerdantError> {
    check_order(start, end)?;
    if start < span_start || end > span_end {
        return Err(VerdantError::invalid_arg(format!(
            "forecast scope [{start}, {end}) is outside the available data [{span_start}, {span_end})"
        )));
    }
    TimeWindow::try_new(start, end)
}

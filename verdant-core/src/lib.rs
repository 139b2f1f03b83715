//! verdant-core
//!
//! Core types, traits, and the time-series engine shared across the verdant ecosystem.
//!
//! - `types`: re-exported value types (samples, windows, forecasts, errors).
//! - `connector`: the `VerdantConnector` trait and capability provider traits.
//! - `timeseries`: window padding, the duration-aware filter, the weighted
//!   rolling-average resampler, optimal-sample selection, and average intensity.
//! - `forecast`: the pipeline composing the above for a single forecast.
//!
//! Every engine operation is a pure function (or lazy iterator) over its
//! inputs; nothing here holds process-wide state, so independent calls may run
//! concurrently without coordination.
#![warn(missing_docs)]

/// Connector capability traits and the primary `VerdantConnector` interface.
pub mod connector;
/// Forecast scoping, resampling, and optimal-point selection.
pub mod forecast;
/// Time-series utilities for padding, filtering, and resampling samples.
pub mod timeseries;
pub mod types;

pub use connector::VerdantConnector;
pub use forecast::process_forecast;
pub use timeseries::average::average_intensity;
pub use timeseries::filter::{FilterByDuration, filter_by_duration};
pub use timeseries::optimal::{select_all_optimal, select_optimal};
pub use timeseries::resample::{RollingAverage, average_over_period, rolling_average};
pub use timeseries::window::{pad_window, trim_to_window};
pub use types::*;

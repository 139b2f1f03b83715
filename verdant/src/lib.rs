//! Verdant orchestrates carbon-intensity requests across multiple data providers.
//!
//! Overview
//! - Routes requests to connectors that implement the `verdant_core` contracts.
//! - Applies per-location priorities to influence provider order.
//! - Pads short requests to each provider's minimum sampling window and trims
//!   the answer back, so callers always see samples overlapping what they asked for.
//! - Resamples series into duration-weighted rolling averages on request and
//!   annotates forecasts with their optimal (lowest-intensity) point.
//! - Normalizes error handling and exposes uniform domain types from `verdant_core`.
//!
//! Key behaviors and trade-offs
//! - Fetch strategy:
//!   - `PriorityWithFallback`: deterministic order, per-provider timeout, aggregates
//!     errors; fewer concurrent requests but potentially higher latency.
//!   - `Latency`: races eligible providers; lowest tail latency but higher request fanout.
//! - Resampling drops windows that the data does not fully cover, so a rolling
//!   average is never computed over a gap. Expect fewer outputs than ticks near
//!   the end of a series or around missing data.
//! - Best-emissions queries return every tied minimum; forecasts report a single
//!   optimal point (the earliest among ties).
//!
//! Examples
//! Building an orchestrator and querying it:
//! ```rust,ignore
//! use std::sync::Arc;
//! use chrono::{TimeDelta, Utc};
//! use verdant::{ForecastParams, TimeWindow, Verdant};
//! use verdant_mock::MockConnector;
//!
//! let verdant = Verdant::builder()
//!     .with_connector(Arc::new(MockConnector::new()))
//!     .build()?;
//!
//! let now = Utc::now();
//! let window = TimeWindow::starting_at(now, TimeDelta::hours(2))?;
//! let hourly = verdant
//!     .emissions(&["eastus", "westus"], &window, Some(TimeDelta::hours(1)))
//!     .await?;
//! let best = verdant.best_emissions(&["eastus", "westus"], &window, None).await?;
//!
//! let params = ForecastParams::new().window_size(TimeDelta::minutes(30));
//! let forecasts = verdant.current_forecasts(&["eastus"], &params).await?;
//! ```
//!
//! See `verdant/demos/` for a runnable end-to-end demonstration.
#![warn(missing_docs)]

pub(crate) mod core;
mod router;

pub use crate::core::{Verdant, VerdantBuilder};
pub use router::util::{collapse_errors, join_with_deadline};

// Re-export core types for convenience
pub use verdant_core::{
    Capability, ConnectorKey, EmissionsData, EmissionsForecast, FetchStrategy, ForecastParams,
    TimeWindow, VerdantConfig, VerdantConnector, VerdantError,
};

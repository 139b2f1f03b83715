//! Time-series utilities shared by connectors and orchestrator.
//!
//! Modules include:
//! - `window`: widen a request to a provider's minimum sampling window, then trim back
//! - `filter`: keep only samples whose interval overlaps a window
//! - `resample`: duration-weighted rolling averages on a fixed tick
//! - `optimal`: lowest-rated sample selection
//! - `average`: overlap-weighted mean intensity over a window
/// Overlap-weighted mean intensity.
pub mod average;
/// Duration-aware interval filter.
pub mod filter;
/// Minimum-rated sample selection.
pub mod optimal;
/// Weighted rolling-average resampler.
pub mod resample;
/// Minimum-sampling-window padding.
pub mod window;

//! Verdant-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod capability;
mod config;
mod connector;
mod emissions;
/// Unified error type.
pub mod error;
mod forecast;
pub mod serde_duration;

pub use capability::Capability;
pub use config::{FetchStrategy, VerdantConfig};
pub use connector::ConnectorKey;
pub use emissions::{EmissionsData, TimeWindow};
pub use error::VerdantError;
pub use forecast::{EmissionsForecast, ForecastParams};

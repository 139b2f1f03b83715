//! Re-export of foundational types from `verdant-types`.
// Consolidated re-exports so downstream crates can depend on `verdant-core` only

pub use verdant_types::{Capability, ConnectorKey, VerdantError};
pub use verdant_types::{EmissionsData, EmissionsForecast, ForecastParams, TimeWindow};
pub use verdant_types::{FetchStrategy, VerdantConfig};

pub use chrono::{DateTime, TimeDelta, Utc};

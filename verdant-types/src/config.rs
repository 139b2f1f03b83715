//! Orchestrator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the orchestrator picks a provider for one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FetchStrategy {
    /// Try providers one at a time in priority order; the first success wins.
    #[default]
    PriorityWithFallback,
    /// Query every eligible provider at once; the first success wins.
    Latency,
}

/// Settings for the `Verdant` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdantConfig {
    /// Provider selection strategy.
    pub fetch_strategy: FetchStrategy,
    /// Bound on a single provider call.
    pub provider_timeout: Duration,
    /// Bound on a whole public operation, across all locations and providers.
    pub request_timeout: Option<Duration>,
}

impl Default for VerdantConfig {
    fn default() -> Self {
        Self {
            fetch_strategy: FetchStrategy::PriorityWithFallback,
            provider_timeout: Duration::from_secs(5),
            request_timeout: None,
        }
    }
}

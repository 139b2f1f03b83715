use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every failure verdant reports, from argument checks in the time-series
/// engine to per-provider failures and their aggregates in the orchestrator.
///
/// Windows the resampler cannot cover, and queries that match no data, are
/// not errors: they show up as missing output.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VerdantError {
    /// No connector offers this capability for the location.
    #[error("capability not offered: {capability}")]
    Unsupported {
        /// Capability label, e.g. `"forecast:historical"`.
        capability: String,
    },

    /// A provider returned data that breaks an ordering or shape guarantee.
    #[error("bad provider data: {0}")]
    Data(String),

    /// A caller-supplied or provider-advertised argument was rejected
    /// (inverted window, negative duration, non-positive tick).
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Failure raised by one connector, tagged with its name.
    #[error("connector {connector}: {msg}")]
    Connector {
        /// Name of the connector.
        connector: String,
        /// What went wrong.
        msg: String,
    },

    /// Anything not covered by another variant.
    #[error("{0}")]
    Other(String),

    /// The provider has no data for the request.
    #[error("no data: {what}")]
    NotFound {
        /// What was asked for, e.g. `"emissions for eastus"`.
        what: String,
    },

    /// Every provider tried failed; one entry per attempt, in attempt order.
    #[error("every provider failed: {0:?}")]
    AllProvidersFailed(Vec<VerdantError>),

    /// One provider did not answer within `provider_timeout`.
    #[error("{connector} timed out serving {capability}")]
    ProviderTimeout {
        /// Name of the slow connector.
        connector: String,
        /// Capability it was serving.
        capability: String,
    },

    /// The whole operation ran past `request_timeout`.
    #[error("{capability} request exceeded its deadline")]
    RequestTimeout {
        /// Operation label.
        capability: String,
    },

    /// Every provider tried ran past `provider_timeout`.
    #[error("every provider timed out serving {capability}")]
    AllProvidersTimedOut {
        /// Capability that was being served.
        capability: String,
    },
}

impl VerdantError {
    /// `Unsupported` for `capability`.
    #[must_use]
    pub fn unsupported(capability: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: capability.into(),
        }
    }

    /// `InvalidArg` with a message.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// `Connector` failure attributed to `connector`.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// `NotFound` describing the missing data.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// `ProviderTimeout` for one connector and capability.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// `RequestTimeout` for an operation label.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Whether a caller can do something about this error.
    ///
    /// A missing capability or missing data is expected in a multi-provider
    /// setup and is not actionable. An aggregate is actionable when any of its
    /// members is.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        match self {
            Self::Unsupported { .. } | Self::NotFound { .. } => false,
            Self::AllProvidersFailed(errors) => errors.iter().any(Self::is_actionable),
            _ => true,
        }
    }

    /// The leaf errors of this error, with nested aggregates expanded in order.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        if let Self::AllProvidersFailed(errors) = self {
            errors.into_iter().flat_map(Self::flatten).collect()
        } else {
            vec![self]
        }
    }
}

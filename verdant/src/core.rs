use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use verdant_core::connector::ConnectorKey;
use verdant_core::{Capability, FetchStrategy, VerdantConfig, VerdantConnector, VerdantError};

use crate::router::util::collapse_errors;

/// Orchestrator that routes carbon-intensity requests across registered providers.
pub struct Verdant {
    pub(crate) connectors: Vec<Arc<dyn VerdantConnector>>,
    pub(crate) per_location_priority: HashMap<String, Vec<ConnectorKey>>,
    pub(crate) cfg: VerdantConfig,
}

/// Builder for constructing a `Verdant` orchestrator with custom configuration.
pub struct VerdantBuilder {
    connectors: Vec<Arc<dyn VerdantConnector>>,
    per_location_priority: HashMap<String, Vec<ConnectorKey>>,
    cfg: VerdantConfig,
}

impl Default for VerdantBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VerdantBuilder {
    /// Empty builder: no connectors, priority-with-fallback fetches, a 5s
    /// provider timeout and no request deadline.
    ///
    /// At least one [`with_connector`] call is needed before [`build`].
    ///
    /// [`with_connector`]: VerdantBuilder::with_connector
    /// [`build`]: VerdantBuilder::build
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            per_location_priority: HashMap::new(),
            cfg: VerdantConfig::default(),
        }
    }

    /// Add a connector.
    ///
    /// Registration order is the fallback order for locations without a
    /// [`prefer_for_location`] entry, and the tie-break after the preferred
    /// connectors for those with one. Registering a connector twice makes it
    /// eligible twice.
    ///
    /// [`prefer_for_location`]: VerdantBuilder::prefer_for_location
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn VerdantConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Set preferred providers for a location using connector instances.
    ///
    /// The list is an ordering hint; unlisted but capable connectors are still
    /// considered after the listed ones.
    #[must_use]
    pub fn prefer_for_location(
        mut self,
        location: &str,
        connectors_desc: &[Arc<dyn VerdantConnector>],
    ) -> Self {
        let keys: Vec<ConnectorKey> = connectors_desc.iter().map(|c| c.key()).collect();
        self.per_location_priority.insert(location.to_string(), keys);
        self
    }

    /// How a provider is chosen for each location.
    ///
    /// `PriorityWithFallback` calls one provider at a time, so a location costs
    /// a single upstream request when the preferred provider answers.
    /// `Latency` calls every eligible provider at once and keeps the first
    /// success.
    #[must_use]
    pub const fn fetch_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.cfg.fetch_strategy = strategy;
        self
    }

    /// Bound on each individual provider call.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Set an overall request timeout for each public operation.
    ///
    /// When exceeded, the operation returns a `RequestTimeout` error for its
    /// capability, even if some locations already completed.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Replace the whole configuration, e.g. one deserialized by the caller.
    #[must_use]
    pub fn config(mut self, cfg: VerdantConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the `Verdant` orchestrator.
    ///
    /// Priority entries naming unregistered connectors are dropped and
    /// duplicates removed.
    ///
    /// # Errors
    /// `InvalidArg` when [`with_connector`] was never called.
    ///
    /// [`with_connector`]: VerdantBuilder::with_connector
    pub fn build(mut self) -> Result<Verdant, VerdantError> {
        if self.connectors.is_empty() {
            return Err(VerdantError::invalid_arg(
                "no connectors registered; add at least one via with_connector(...)",
            ));
        }

        let known: HashSet<&'static str> = self.connectors.iter().map(|c| c.name()).collect();
        for keys in self.per_location_priority.values_mut() {
            let mut seen: HashSet<&'static str> = HashSet::new();
            keys.retain(|k| known.contains(k.as_str()) && seen.insert(k.as_str()));
        }

        Ok(Verdant {
            connectors: self.connectors,
            per_location_priority: self.per_location_priority,
            cfg: self.cfg,
        })
    }
}

pub(crate) fn tag_err(connector: &str, e: VerdantError) -> VerdantError {
    match e {
        e @ (VerdantError::NotFound { .. }
        | VerdantError::Unsupported { .. }
        | VerdantError::ProviderTimeout { .. }
        | VerdantError::Connector { .. }
        | VerdantError::RequestTimeout { .. }
        | VerdantError::AllProvidersTimedOut { .. }
        | VerdantError::AllProvidersFailed(_)) => e,
        other => VerdantError::connector(connector, other.to_string()),
    }
}

/// Bound `fut` by an optional overall deadline.
///
/// On expiry returns `RequestTimeout { capability: "request" }`; call sites
/// remap the label to their own capability.
pub(crate) async fn with_request_deadline<T, Fut>(
    deadline: Option<Duration>,
    fut: Fut,
) -> Result<T, VerdantError>
where
    Fut: core::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| VerdantError::request_timeout("request")),
        None => Ok(fut.await),
    }
}

impl Verdant {
    /// Run one provider call under `timeout`; expiry becomes `ProviderTimeout`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "verdant::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, VerdantError>
    where
        Fut: core::future::Future<Output = Result<T, VerdantError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(VerdantError::provider_timeout(connector_name, capability)))
    }

    /// Start building a new `Verdant` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use verdant::{FetchStrategy, Verdant};
    ///
    /// let watttime = Arc::new(WattTimeConnector::new("..."));
    /// let mock = Arc::new(verdant_mock::MockConnector::new());
    ///
    /// let verdant = Verdant::builder()
    ///     .with_connector(watttime.clone())
    ///     .with_connector(mock.clone())
    ///     .prefer_for_location("eastus", &[mock, watttime])
    ///     .fetch_strategy(FetchStrategy::PriorityWithFallback)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> VerdantBuilder {
        VerdantBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &VerdantConfig {
        &self.cfg
    }

    pub(crate) fn ordered(&self, location: &str) -> Vec<Arc<dyn VerdantConnector>> {
        let mut out: Vec<(usize, Arc<dyn VerdantConnector>)> =
            self.connectors.iter().cloned().enumerate().collect();
        if let Some(pref) = self.per_location_priority.get(location) {
            let rank: HashMap<&str, usize> = pref
                .iter()
                .enumerate()
                .map(|(rank, key)| (key.as_str(), rank))
                .collect();
            out.sort_by_key(|(registered, c)| {
                (rank.get(c.name()).copied().unwrap_or(usize::MAX), *registered)
            });
        }
        out.into_iter().map(|(_, c)| c).collect()
    }

    /// Generic single-location fetch honoring the configured `FetchStrategy`.
    ///
    /// - `call` returns `None` for connectors that cannot serve the request;
    ///   those are not attempted.
    /// - Applies the per-provider timeout in both modes.
    /// - Failures collapse via [`collapse_errors`], reporting `NotFound` as
    ///   "{`not_found_label`} for {location}".
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "verdant::core::fetch_single",
            skip(self, call),
            fields(location = %location, capability = %capability),
        )
    )]
    pub(crate) async fn fetch_single<T, F, Fut>(
        &self,
        location: &str,
        capability: Capability,
        not_found_label: &'static str,
        call: F,
    ) -> Result<T, VerdantError>
    where
        T: Send,
        F: Fn(Arc<dyn VerdantConnector>, String) -> Option<Fut> + Send,
        Fut: core::future::Future<Output = Result<T, VerdantError>> + Send,
    {
        let (attempted_any, res) = match self.cfg.fetch_strategy {
            FetchStrategy::PriorityWithFallback => {
                self.fetch_single_priority_with_fallback(location, capability, call)
                    .await
            }
            FetchStrategy::Latency => self.fetch_single_latency(location, capability, call).await,
        };
        res.map_err(|errors| {
            collapse_errors(
                capability,
                attempted_any,
                errors,
                Some(format!("{not_found_label} for {location}")),
            )
        })
    }

    async fn fetch_single_priority_with_fallback<T, F, Fut>(
        &self,
        location: &str,
        capability: Capability,
        call: F,
    ) -> (bool, Result<T, Vec<VerdantError>>)
    where
        F: Fn(Arc<dyn VerdantConnector>, String) -> Option<Fut>,
        Fut: core::future::Future<Output = Result<T, VerdantError>>,
    {
        let mut attempted_any = false;
        let mut errors: Vec<VerdantError> = Vec::new();

        for c in self.ordered(location) {
            let Some(fut) = call(c.clone(), location.to_string()) else {
                continue;
            };
            attempted_any = true;
            match Self::provider_call_with_timeout(
                c.name(),
                capability.as_str(),
                self.cfg.provider_timeout,
                fut,
            )
            .await
            {
                Ok(v) => return (true, Ok(v)),
                Err(e @ (VerdantError::NotFound { .. } | VerdantError::ProviderTimeout { .. })) => {
                    errors.push(e);
                }
                Err(e) => errors.push(tag_err(c.name(), e)),
            }
            #[cfg(feature = "tracing")]
            if let Some(last) = errors.last() {
                tracing::warn!(connector = c.name(), error = %last, "provider failed; falling back");
            }
        }

        (attempted_any, Err(errors))
    }

    async fn fetch_single_latency<T, F, Fut>(
        &self,
        location: &str,
        capability: Capability,
        call: F,
    ) -> (bool, Result<T, Vec<VerdantError>>)
    where
        F: Fn(Arc<dyn VerdantConnector>, String) -> Option<Fut>,
        Fut: core::future::Future<Output = Result<T, VerdantError>>,
    {
        use futures::stream::{FuturesUnordered, StreamExt};

        let mut futs = FuturesUnordered::new();
        for c in self.ordered(location) {
            if let Some(fut) = call(c.clone(), location.to_string()) {
                let name = c.name();
                let timeout = self.cfg.provider_timeout;
                futs.push(async move {
                    (
                        name,
                        Self::provider_call_with_timeout(name, capability.as_str(), timeout, fut)
                            .await,
                    )
                });
            }
        }
        let attempted_any = !futs.is_empty();

        let mut errors: Vec<VerdantError> = Vec::new();
        while let Some((name, res)) = futs.next().await {
            match res {
                Ok(v) => return (true, Ok(v)),
                Err(e @ (VerdantError::ProviderTimeout { .. } | VerdantError::NotFound { .. })) => {
                    errors.push(e);
                }
                Err(e) => errors.push(tag_err(name, e)),
            }
        }

        (attempted_any, Err(errors))
    }
}

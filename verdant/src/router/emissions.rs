use std::sync::Arc;

use chrono::TimeDelta;
use verdant_core::{
    Capability, EmissionsData, TimeWindow, VerdantConnector, VerdantError, pad_window,
    rolling_average, select_all_optimal, trim_to_window,
};

use crate::Verdant;
use crate::router::util::{join_with_deadline, relabel_timeout};

fn ensure_ordered(samples: &[EmissionsData]) -> Result<(), VerdantError> {
    if samples.windows(2).any(|w| w[1].time < w[0].time) {
        return Err(VerdantError::Data("samples are not ordered by time".to_string()));
    }
    Ok(())
}

async fn fetch_trimmed(
    c: Arc<dyn VerdantConnector>,
    location: String,
    window: TimeWindow,
) -> Result<Vec<EmissionsData>, VerdantError> {
    let p = c.as_emissions_provider().ok_or_else(|| {
        VerdantError::connector(c.name(), "missing emissions capability during call")
    })?;
    let fetch_window = match p.min_sampling_window() {
        Some(m) => pad_window(&window, m)?,
        None => window,
    };
    let raw = p.emissions(&location, &fetch_window).await?;
    ensure_ordered(&raw)?;
    Ok(trim_to_window(raw, &window).collect())
}

impl Verdant {
    /// Fetch one location's samples overlapping `window` from the first
    /// provider that answers.
    ///
    /// Each provider's request is padded to its minimum sampling window and
    /// the answer trimmed back to `window`.
    pub(crate) async fn fetch_emissions(
        &self,
        location: &str,
        window: &TimeWindow,
    ) -> Result<Vec<EmissionsData>, VerdantError> {
        let window = *window;
        self.fetch_single(
            location,
            Capability::Emissions,
            "emissions",
            move |c, loc| {
                if !c.supports_location(&loc) {
                    return None;
                }
                c.as_emissions_provider()?;
                Some(fetch_trimmed(c, loc, window))
            },
        )
        .await
    }

    async fn location_emissions(
        &self,
        location: &str,
        window: &TimeWindow,
        duration: Option<TimeDelta>,
    ) -> Result<Vec<EmissionsData>, VerdantError> {
        let samples = self.fetch_emissions(location, window).await?;
        #[cfg(feature = "tracing")]
        if duration.is_some_and(|d| !d.is_zero()) {
            tracing::debug!(location, samples = samples.len(), ?duration, "resampling emissions");
        }
        Ok(rolling_average(samples, duration, None)?.collect())
    }

    async fn collect_emissions(
        &self,
        capability: Capability,
        locations: &[&str],
        window: &TimeWindow,
        duration: Option<TimeDelta>,
    ) -> Result<Vec<EmissionsData>, VerdantError> {
        if locations.is_empty() {
            return Err(VerdantError::invalid_arg("at least one location is required"));
        }
        if let Some(d) = duration
            && d < TimeDelta::zero()
        {
            return Err(VerdantError::invalid_arg(format!(
                "duration must be >= 0, got {d}"
            )));
        }

        let tasks = locations
            .iter()
            .map(|loc| self.location_emissions(loc, window, duration));
        let results = join_with_deadline(tasks, self.cfg.request_timeout)
            .await
            .map_err(|e| relabel_timeout(capability, e))?;

        let mut out: Vec<EmissionsData> = Vec::new();
        for res in results {
            out.extend(res?);
        }
        Ok(out)
    }

    /// Fetch observed emissions for every location over `window`.
    ///
    /// Behavior and trade-offs:
    /// - Locations are queried concurrently; results are concatenated in the
    ///   order of `locations`, each location's samples in time order.
    /// - Providers with a minimum sampling window receive a padded request; the
    ///   answer is trimmed so only samples overlapping `window` remain (they are
    ///   kept whole, not clipped).
    /// - With `duration`, each location's series is resampled into rolling
    ///   averages of that size, ticking at the provider's native granularity.
    ///   Windows not fully covered by data are dropped.
    ///
    /// # Errors
    /// `InvalidArg` for an empty `locations` slice or a negative `duration`.
    /// Otherwise the first failing location's error, in `locations` order, or
    /// `RequestTimeout` when the configured request deadline elapses.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "verdant::router",
            skip(self, window),
            fields(start = %window.start(), end = %window.end()),
        )
    )]
    pub async fn emissions(
        &self,
        locations: &[&str],
        window: &TimeWindow,
        duration: Option<TimeDelta>,
    ) -> Result<Vec<EmissionsData>, VerdantError> {
        self.collect_emissions(Capability::Emissions, locations, window, duration)
            .await
    }

    /// The lowest-rated samples across every location over `window`.
    ///
    /// Returns every sample tied for the minimum rating, in the same order as
    /// [`emissions`](Self::emissions) would report them. Empty when no
    /// provider returned data.
    ///
    /// # Errors
    /// Same as [`emissions`](Self::emissions).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "verdant::router",
            skip(self, window),
            fields(start = %window.start(), end = %window.end()),
        )
    )]
    pub async fn best_emissions(
        &self,
        locations: &[&str],
        window: &TimeWindow,
        duration: Option<TimeDelta>,
    ) -> Result<Vec<EmissionsData>, VerdantError> {
        let all = self
            .collect_emissions(Capability::BestEmissions, locations, window, duration)
            .await?;
        Ok(select_all_optimal(all))
    }
}

use verdant_core::{Capability, TimeWindow, VerdantError, average_intensity};

use crate::Verdant;
use crate::core::with_request_deadline;
use crate::router::util::relabel_timeout;

impl Verdant {
    /// Duration-weighted average carbon intensity for `location` over `window`.
    ///
    /// Samples are fetched the same way as [`emissions`](Self::emissions)
    /// (padded to the provider's minimum sampling window, then trimmed). Each
    /// sample is weighted by its overlap with `window`, and the mean is taken
    /// over the covered time only.
    ///
    /// # Errors
    /// `NotFound` when no sample overlaps `window`; otherwise provider errors
    /// collapsed as for any single-location fetch, or `RequestTimeout`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "verdant::router",
            skip(self, window),
            fields(start = %window.start(), end = %window.end()),
        )
    )]
    pub async fn average_intensity(
        &self,
        location: &str,
        window: &TimeWindow,
    ) -> Result<f64, VerdantError> {
        let samples = with_request_deadline(
            self.cfg.request_timeout,
            self.fetch_emissions(location, window),
        )
        .await
        .map_err(|e| relabel_timeout(Capability::AverageIntensity, e))??;

        average_intensity(&samples, window).ok_or_else(|| {
            VerdantError::not_found(format!("average intensity for {location}"))
        })
    }
}

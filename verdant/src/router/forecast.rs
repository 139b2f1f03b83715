use std::sync::Arc;

use chrono::{DateTime, Utc};
use verdant_core::{
    Capability, EmissionsForecast, ForecastParams, VerdantConnector, VerdantError,
    process_forecast,
};

use crate::Verdant;
use crate::core::with_request_deadline;
use crate::router::util::{join_with_deadline, relabel_timeout};

async fn current_raw(
    c: Arc<dyn VerdantConnector>,
    location: String,
) -> Result<EmissionsForecast, VerdantError> {
    let p = c.as_forecast_provider().ok_or_else(|| {
        VerdantError::connector(c.name(), "missing forecast capability during call")
    })?;
    p.current_forecast(&location).await
}

async fn historical_raw(
    c: Arc<dyn VerdantConnector>,
    location: String,
    requested_at: DateTime<Utc>,
) -> Result<EmissionsForecast, VerdantError> {
    let p = c.as_forecast_provider().ok_or_else(|| {
        VerdantError::connector(c.name(), "missing forecast capability during call")
    })?;
    p.forecast_at(&location, requested_at).await
}

impl Verdant {
    async fn location_forecast(
        &self,
        location: &str,
        params: &ForecastParams,
    ) -> Result<EmissionsForecast, VerdantError> {
        let raw = self
            .fetch_single(
                location,
                Capability::CurrentForecast,
                "forecast",
                |c, loc| {
                    if !c.supports_location(&loc) {
                        return None;
                    }
                    c.as_forecast_provider()?;
                    Some(current_raw(c, loc))
                },
            )
            .await?;
        process_forecast(raw, params, Utc::now())
    }

    /// Fetch the latest forecast for every location and post-process it.
    ///
    /// Behavior and trade-offs:
    /// - Locations are queried concurrently; the result keeps `locations` order.
    /// - Each forecast is scoped to `params.data_start_at..params.data_end_at`
    ///   (defaulting to the forecast's own span), resampled to
    ///   `params.window_size` when given, and annotated with its single
    ///   lowest-rated point. `requested_at` defaults to the current time.
    ///
    /// # Errors
    /// `InvalidArg` for an empty `locations` slice or parameters rejected by
    /// the forecast pipeline. Otherwise the first failing location's error, in
    /// `locations` order, or `RequestTimeout`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "verdant::router", skip(self, params))
    )]
    pub async fn current_forecasts(
        &self,
        locations: &[&str],
        params: &ForecastParams,
    ) -> Result<Vec<EmissionsForecast>, VerdantError> {
        if locations.is_empty() {
            return Err(VerdantError::invalid_arg("at least one location is required"));
        }
        let tasks = locations
            .iter()
            .map(|loc| self.location_forecast(loc, params));
        let results = join_with_deadline(tasks, self.cfg.request_timeout)
            .await
            .map_err(|e| relabel_timeout(Capability::CurrentForecast, e))?;
        results.into_iter().collect()
    }

    /// Fetch the forecast that was current for `location` at `requested_at`.
    ///
    /// The forecast goes through the same pipeline as
    /// [`current_forecasts`](Self::current_forecasts); `params.requested_at`
    /// defaults to `requested_at` rather than the current time.
    ///
    /// # Errors
    /// `Unsupported` when no registered connector keeps forecast history for
    /// the location; otherwise as for [`current_forecasts`](Self::current_forecasts).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "verdant::router",
            skip(self, params),
            fields(requested_at = %requested_at),
        )
    )]
    pub async fn forecast_at(
        &self,
        location: &str,
        requested_at: DateTime<Utc>,
        params: &ForecastParams,
    ) -> Result<EmissionsForecast, VerdantError> {
        let fetch = self.fetch_single(
            location,
            Capability::HistoricalForecast,
            "historical forecast",
            move |c, loc| {
                if !c.supports_location(&loc) {
                    return None;
                }
                c.as_forecast_provider()?;
                Some(historical_raw(c, loc, requested_at))
            },
        );
        let raw = with_request_deadline(self.cfg.request_timeout, fetch)
            .await
            .map_err(|e| relabel_timeout(Capability::HistoricalForecast, e))??;

        let params = ForecastParams {
            requested_at: params.requested_at.or(Some(requested_at)),
            ..params.clone()
        };
        process_forecast(raw, &params, requested_at)
    }
}

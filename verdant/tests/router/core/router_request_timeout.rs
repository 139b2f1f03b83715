use std::time::Duration;

use verdant::{ForecastParams, Verdant, VerdantError};

use crate::helpers::{EASTUS, MockConnector, WESTUS, m, raw_forecast, series, window};

fn slow(ms: u64) -> std::sync::Arc<MockConnector> {
    MockConnector::builder()
        .name("slow")
        .delay(Duration::from_millis(ms))
        .returns_emissions_ok(series(EASTUS, 0, 5, &[1.0]))
        .returns_current_forecast_ok(raw_forecast(EASTUS, 0, 5, &[1.0, 2.0]))
        .with_forecast_at_fn(|l, _| Ok(raw_forecast(l, 0, 5, &[1.0, 2.0])))
        .build()
}

fn timed_out(err: VerdantError) -> String {
    match err {
        VerdantError::RequestTimeout { capability } => capability,
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn request_deadline_applies_to_every_operation() {
    let v = Verdant::builder()
        .with_connector(slow(300))
        .request_timeout(Duration::from_millis(30))
        .build()
        .unwrap();
    let w = window(0, 5);

    let e = v.emissions(&[EASTUS, WESTUS], &w, None).await.unwrap_err();
    assert_eq!(timed_out(e), "emissions");

    let e = v.best_emissions(&[EASTUS], &w, None).await.unwrap_err();
    assert_eq!(timed_out(e), "emissions:best");

    let e = v.average_intensity(EASTUS, &w).await.unwrap_err();
    assert_eq!(timed_out(e), "average-intensity");

    let params = ForecastParams::new();
    let e = v.current_forecasts(&[EASTUS], &params).await.unwrap_err();
    assert_eq!(timed_out(e), "forecast:current");

    let e = v.forecast_at(EASTUS, m(0), &params).await.unwrap_err();
    assert_eq!(timed_out(e), "forecast:historical");
}

#[tokio::test]
async fn fast_requests_finish_within_deadline() {
    let v = Verdant::builder()
        .with_connector(slow(5))
        .request_timeout(Duration::from_millis(500))
        .build()
        .unwrap();
    let out = v.emissions(&[EASTUS], &window(0, 5), None).await.unwrap();
    assert_eq!(out.len(), 1);
}

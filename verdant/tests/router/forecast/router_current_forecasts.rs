use chrono::TimeDelta;
use verdant::{ForecastParams, Verdant, VerdantError};

use crate::helpers::{EASTUS, MockConnector, WESTUS, m, raw_forecast};

const RATINGS: [f64; 6] = [30.0, 20.0, 10.0, 20.0, 30.0, 40.0];

fn forecaster() -> std::sync::Arc<MockConnector> {
    MockConnector::builder()
        .with_current_forecast_fn(|loc| Ok(raw_forecast(loc, 0, 5, &RATINGS)))
        .build()
}

#[tokio::test]
async fn raw_forecast_gets_optimal_point() {
    let v = Verdant::builder().with_connector(forecaster()).build().unwrap();
    let params = ForecastParams::new().requested_at(m(1));
    let out = v.current_forecasts(&[EASTUS], &params).await.unwrap();

    assert_eq!(out.len(), 1);
    let f = &out[0];
    assert_eq!(f.location, EASTUS);
    assert_eq!(f.requested_at, m(1));
    assert_eq!(f.generated_at, m(0));
    assert_eq!((f.data_start_at, f.data_end_at), (m(0), m(30)));
    assert_eq!(f.window_size, TimeDelta::minutes(5));
    assert_eq!(f.forecast_data.len(), 6);
    let best = f.optimal_data_point.as_ref().expect("optimal point");
    assert_eq!((best.time, best.rating), (m(10), 10.0));
}

#[tokio::test]
async fn window_size_resamples_and_picks_earliest_minimum() {
    let v = Verdant::builder().with_connector(forecaster()).build().unwrap();
    let params = ForecastParams::new().window_size(TimeDelta::minutes(10));
    let out = v.current_forecasts(&[EASTUS], &params).await.unwrap();
    let f = &out[0];

    let got: Vec<f64> = f.forecast_data.iter().map(|s| s.rating).collect();
    assert_eq!(got, vec![25.0, 15.0, 15.0, 25.0, 35.0]);
    assert_eq!(f.window_size, TimeDelta::minutes(10));
    let best = f.optimal_data_point.as_ref().expect("optimal point");
    assert_eq!((best.time, best.rating), (m(5), 15.0));
}

#[tokio::test]
async fn scope_narrows_the_data() {
    let v = Verdant::builder().with_connector(forecaster()).build().unwrap();
    let params = ForecastParams::new()
        .data_start_at(m(10))
        .data_end_at(m(20));
    let f = v
        .current_forecasts(&[EASTUS], &params)
        .await
        .unwrap()
        .remove(0);

    let got: Vec<f64> = f.forecast_data.iter().map(|s| s.rating).collect();
    assert_eq!(got, vec![10.0, 20.0]);
    assert_eq!((f.data_start_at, f.data_end_at), (m(10), m(20)));
}

#[tokio::test]
async fn scope_outside_the_data_is_invalid() {
    let v = Verdant::builder().with_connector(forecaster()).build().unwrap();
    let params = ForecastParams::new().data_end_at(m(60));
    let err = v.current_forecasts(&[EASTUS], &params).await.unwrap_err();
    assert!(matches!(err, VerdantError::InvalidArg(_)));

    let inverted = ForecastParams::new().data_start_at(m(20)).data_end_at(m(10));
    let err = v.current_forecasts(&[EASTUS], &inverted).await.unwrap_err();
    assert!(matches!(err, VerdantError::InvalidArg(_)));
}

#[tokio::test]
async fn several_locations_keep_order() {
    let v = Verdant::builder().with_connector(forecaster()).build().unwrap();
    let out = v
        .current_forecasts(&[WESTUS, EASTUS], &ForecastParams::new())
        .await
        .unwrap();
    let locs: Vec<&str> = out.iter().map(|f| f.location.as_str()).collect();
    assert_eq!(locs, vec![WESTUS, EASTUS]);
}

#[tokio::test]
async fn empty_forecast_is_not_an_error() {
    let c = MockConnector::builder()
        .with_current_forecast_fn(|loc| Ok(raw_forecast(loc, 0, 5, &[])))
        .build();
    let v = Verdant::builder().with_connector(c).build().unwrap();
    let params = ForecastParams::new().requested_at(m(3));
    let f = v
        .current_forecasts(&[EASTUS], &params)
        .await
        .unwrap()
        .remove(0);

    assert!(f.forecast_data.is_empty());
    assert!(f.optimal_data_point.is_none());
    assert_eq!(f.requested_at, m(3));
}

#[tokio::test]
async fn errors_surface_per_location() {
    let v = Verdant::builder().with_connector(forecaster()).build().unwrap();
    let err = v
        .current_forecasts(&[], &ForecastParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, VerdantError::InvalidArg(_)));

    let c = MockConnector::builder()
        .with_current_forecast_fn(|_| Err(VerdantError::not_found("nope")))
        .build();
    let v = Verdant::builder().with_connector(c).build().unwrap();
    let err = v
        .current_forecasts(&[EASTUS], &ForecastParams::new())
        .await
        .unwrap_err();
    assert_eq!(err, VerdantError::not_found("forecast for eastus"));
}

#[tokio::test]
async fn negative_window_size_is_invalid() {
    let v = Verdant::builder().with_connector(forecaster()).build().unwrap();
    let params = ForecastParams::new().window_size(TimeDelta::minutes(-10));
    let err = v.current_forecasts(&[EASTUS], &params).await.unwrap_err();
    assert!(matches!(err, VerdantError::InvalidArg(_)));
}

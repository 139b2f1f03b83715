use std::time::Duration;

use verdant::{FetchStrategy, Verdant, VerdantError};

use crate::helpers::{EASTUS, MockConnector, series, window};

#[tokio::test]
async fn strategy_latency_returns_fastest_success() {
    let fast_ok = MockConnector::builder()
        .name("fast")
        .delay(Duration::from_millis(10))
        .returns_emissions_ok(series(EASTUS, 0, 5, &[11.0]))
        .build();
    let slow_ok = MockConnector::builder()
        .name("slow")
        .delay(Duration::from_millis(100))
        .returns_emissions_ok(series(EASTUS, 0, 5, &[99.0]))
        .build();

    let v = Verdant::builder()
        .with_connector(slow_ok)
        .with_connector(fast_ok)
        .fetch_strategy(FetchStrategy::Latency)
        .build()
        .unwrap();

    let out = v.emissions(&[EASTUS], &window(0, 5), None).await.unwrap();
    assert_eq!(out[0].rating, 11.0);
}

#[tokio::test]
async fn strategy_latency_ignores_faster_failure_and_returns_first_success() {
    // Fail immediately faster than the successful provider
    let fast_fail = MockConnector::builder()
        .name("fast_fail")
        .delay(Duration::from_millis(5))
        .emissions_fail(VerdantError::Other("boom".into()))
        .build();
    let slow_ok = MockConnector::builder()
        .name("slow_ok")
        .delay(Duration::from_millis(20))
        .returns_emissions_ok(series(EASTUS, 0, 5, &[77.0]))
        .build();

    let v = Verdant::builder()
        .with_connector(fast_fail)
        .with_connector(slow_ok)
        .fetch_strategy(FetchStrategy::Latency)
        .build()
        .unwrap();

    let out = v.emissions(&[EASTUS], &window(0, 5), None).await.unwrap();
    assert_eq!(out[0].rating, 77.0);
}

#[tokio::test]
async fn strategy_priority_with_fallback_obeys_order_and_timeout() {
    // First connector times out beyond configured threshold; second succeeds
    let very_slow = MockConnector::builder()
        .name("first")
        .delay(Duration::from_millis(200))
        .returns_emissions_ok(series(EASTUS, 0, 5, &[1000.0]))
        .build();
    let ok = MockConnector::builder()
        .name("second")
        .delay(Duration::from_millis(10))
        .returns_emissions_ok(series(EASTUS, 0, 5, &[42.0]))
        .build();

    let v = Verdant::builder()
        .with_connector(very_slow)
        .with_connector(ok)
        .fetch_strategy(FetchStrategy::PriorityWithFallback)
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let out = v.emissions(&[EASTUS], &window(0, 5), None).await.unwrap();
    assert_eq!(out[0].rating, 42.0);
}

#[tokio::test]
async fn all_providers_timing_out_collapses() {
    let a = MockConnector::builder()
        .name("a")
        .delay(Duration::from_millis(200))
        .returns_emissions_ok(vec![])
        .build();
    let b = MockConnector::builder()
        .name("b")
        .delay(Duration::from_millis(200))
        .returns_emissions_ok(vec![])
        .build();

    for strategy in [FetchStrategy::PriorityWithFallback, FetchStrategy::Latency] {
        let v = Verdant::builder()
            .with_connector(a.clone())
            .with_connector(b.clone())
            .fetch_strategy(strategy)
            .provider_timeout(Duration::from_millis(20))
            .build()
            .unwrap();

        let err = v.emissions(&[EASTUS], &window(0, 5), None).await.unwrap_err();
        match err {
            VerdantError::AllProvidersTimedOut { capability } => {
                assert_eq!(capability, "emissions");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}

#[tokio::test]
async fn mixed_failures_are_aggregated_and_tagged() {
    let a = MockConnector::builder()
        .name("a")
        .emissions_fail(VerdantError::Other("down".into()))
        .build();
    let b = MockConnector::builder()
        .name("b")
        .emissions_fail(VerdantError::not_found("emissions for eastus"))
        .build();

    let v = Verdant::builder()
        .with_connector(a)
        .with_connector(b)
        .build()
        .unwrap();

    let err = v.emissions(&[EASTUS], &window(0, 5), None).await.unwrap_err();
    let VerdantError::AllProvidersFailed(errors) = err else {
        panic!("expected aggregate");
    };
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        &errors[0],
        VerdantError::Connector { connector, .. } if connector == "a"
    ));
    assert!(matches!(errors[1], VerdantError::NotFound { .. }));
}

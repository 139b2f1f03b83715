use verdant::Verdant;

use crate::helpers::{EASTUS, MockConnector, WESTUS, m, series, window};

fn two_regions() -> std::sync::Arc<MockConnector> {
    MockConnector::builder()
        .with_emissions_fn(|loc, _w| match loc {
            "eastus" => Ok(series(loc, 0, 5, &[10.0, 5.0, 7.0])),
            _ => Ok(series(loc, 0, 5, &[5.0, 9.0, 9.0])),
        })
        .build()
}

#[tokio::test]
async fn returns_every_tied_minimum_in_order() {
    let v = Verdant::builder().with_connector(two_regions()).build().unwrap();
    let best = v
        .best_emissions(&[EASTUS, WESTUS], &window(0, 15), None)
        .await
        .unwrap();

    let got: Vec<_> = best
        .iter()
        .map(|s| (s.location.as_str(), s.time, s.rating))
        .collect();
    assert_eq!(got, vec![(EASTUS, m(5), 5.0), (WESTUS, m(0), 5.0)]);
}

#[tokio::test]
async fn single_minimum() {
    let v = Verdant::builder().with_connector(two_regions()).build().unwrap();
    let best = v.best_emissions(&[WESTUS], &window(0, 15), None).await.unwrap();
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].time, m(0));
}

#[tokio::test]
async fn best_over_resampled_series() {
    let v = Verdant::builder().with_connector(two_regions()).build().unwrap();
    let best = v
        .best_emissions(
            &[EASTUS, WESTUS],
            &window(0, 15),
            Some(chrono::TimeDelta::minutes(10)),
        )
        .await
        .unwrap();
    // eastus: [7.5, 6.0], westus: [7.0, 9.0]
    assert_eq!(best.len(), 1);
    assert_eq!((best[0].location.as_str(), best[0].rating), (EASTUS, 6.0));
}

#[tokio::test]
async fn empty_data_yields_empty_result() {
    let c = MockConnector::builder().returns_emissions_ok(vec![]).build();
    let v = Verdant::builder().with_connector(c).build().unwrap();
    let best = v.best_emissions(&[EASTUS], &window(0, 15), None).await.unwrap();
    assert!(best.is_empty());
}

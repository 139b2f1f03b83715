use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use tracing_subscriber::fmt::format::FmtSpan;
use verdant::{ForecastParams, TimeWindow, Verdant};
use verdant_mock::MockConnector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,verdant=trace,verdant_core=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let verdant = Verdant::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .request_timeout(std::time::Duration::from_secs(5))
        .build()?;

    let regions = ["eastus", "westus", "uksouth", "northeurope", "francecentral"];
    let now = Utc::now();
    let last_hours = TimeWindow::try_new(now - TimeDelta::hours(4), now)?;

    // Hourly rolling averages for the last four hours
    let hourly = verdant
        .emissions(&regions, &last_hours, Some(TimeDelta::hours(1)))
        .await?;
    println!("{} hourly averages", hourly.len());

    for best in verdant.best_emissions(&regions, &last_hours, None).await? {
        println!(
            "greenest: {} at {} ({:.1} gCO2/kWh)",
            best.location, best.time, best.rating
        );
    }

    let avg = verdant.average_intensity("uksouth", &last_hours).await?;
    println!("uksouth average: {avg:.1} gCO2/kWh");

    // Where and when to run a 30-minute job in the next day
    let params = ForecastParams::new().window_size(TimeDelta::minutes(30));
    for forecast in verdant.current_forecasts(&regions, &params).await? {
        if let Some(p) = forecast.optimal_data_point {
            println!(
                "{}: run at {} ({:.1} gCO2/kWh)",
                forecast.location, p.time, p.rating
            );
        }
    }

    let yesterday = verdant
        .forecast_at("eastus", now - TimeDelta::days(1), &params)
        .await?;
    println!(
        "eastus forecast issued {} had {} windows",
        yesterday.generated_at,
        yesterday.forecast_data.len()
    );

    Ok(())
}

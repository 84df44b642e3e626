use forex_forecast::models::arima::{ArimaModel, ArimaOrder};
use forex_forecast::models::{ForecastModel, TrainedForecastModel};
use forex_forecast::synthetic::generate_test_data;
use forex_forecast::{DataLoader, ForecastConfig, ForecastPipeline};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("Forex Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    // Synthetic USD rates around 1386.85
    let history = generate_test_data(Some(42))?;
    let data = DataLoader::from_records(&history)?;
    println!(
        "Loaded {} observations, mean {:.2}, std dev {:.3}\n",
        data.len(),
        data.mean()?,
        data.std_dev()?
    );

    // Compare a few orders on the same series
    for order in [
        ArimaOrder::new(5, 1, 0),
        ArimaOrder::new(1, 1, 1),
        ArimaOrder::new(2, 0, 0),
    ] {
        let model = ArimaModel::with_order(order);
        let trained = model.train(&data)?;
        let forecast = trained.forecast(7)?;
        println!(
            "{:<14} AIC {:>8.2}  BIC {:>8.2}  next 7 days: {:?}",
            trained.name(),
            trained.aic(),
            trained.bic(),
            forecast
                .values()
                .iter()
                .map(|v| format!("{:.2}", v))
                .collect::<Vec<_>>()
        );
    }

    // Full pipeline with the default configuration
    let pipeline = ForecastPipeline::new(ForecastConfig::default())?;
    println!("\n{}", pipeline.predict(history)?);

    Ok(())
}

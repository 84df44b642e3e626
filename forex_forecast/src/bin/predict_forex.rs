//! Command-line entry point: forecast exchange rates from a JSON argument
//! or from synthetic data.

use clap::error::ErrorKind;
use clap::Parser;
use forex_forecast::synthetic::generate_test_data;
use forex_forecast::{ArimaOrder, ForecastConfig, ForecastPipeline, HistoricalInput};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "predict_forex", version, about = "Forecast exchange rates with ARIMA")]
struct Cli {
    /// JSON array of {currency, rate, timestamp} records. Synthetic data is used when omitted.
    historical_data: Option<String>,

    /// Seed for the synthetic data
    #[arg(long)]
    seed: Option<u64>,

    /// Autoregressive order
    #[arg(long, default_value_t = 5)]
    ar: usize,

    /// Differencing order
    #[arg(long, default_value_t = 1)]
    diff: usize,

    /// Moving-average order
    #[arg(long, default_value_t = 0)]
    ma: usize,

    /// Number of days to forecast
    #[arg(long, default_value_t = 7)]
    horizon: usize,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> forex_forecast::Result<String> {
    let config = ForecastConfig::default()
        .with_order(ArimaOrder::new(cli.ar, cli.diff, cli.ma))
        .with_horizon(cli.horizon);
    let pipeline = ForecastPipeline::new(config)?;

    let input: HistoricalInput = match cli.historical_data {
        Some(text) => text.into(),
        None => generate_test_data(cli.seed)?.into(),
    };

    pipeline.predict(input)
}

fn main() -> ExitCode {
    init_tracing();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            println!("Error in main: {}", err);
            return ExitCode::from(1);
        }
    };

    match run(cli) {
        Ok(json) => {
            println!("\nPrediction results:");
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("Error in main: {}", err);
            ExitCode::from(1)
        }
    }
}

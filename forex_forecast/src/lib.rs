//! # Forex Forecast
//!
//! Short-horizon forecasting of currency exchange rates with a fixed-order
//! ARIMA model.
//!
//! ## Features
//!
//! - Observation records from JSON text or structured values
//! - Time-ordered series with flexible ISO-8601 timestamp parsing
//! - ARIMA(p, d, q) fitted by conditional least squares
//! - Dated predictions serialized as a JSON array
//! - Synthetic 90-day dataset for trying the pipeline without input
//!
//! ## Quick Start
//!
//! ```rust
//! use forex_forecast::{ForecastConfig, ForecastPipeline, Observation};
//!
//! let history: Vec<Observation> = [1386.2, 1387.9, 1385.4, 1386.8, 1388.1,
//!                                  1387.3, 1386.0, 1386.9, 1387.6, 1386.4]
//!     .iter()
//!     .enumerate()
//!     .map(|(day, &rate)| {
//!         Observation::new("USD", rate, format!("2024-03-{:02}T09:00:00", day + 1))
//!     })
//!     .collect();
//!
//! let pipeline = ForecastPipeline::new(ForecastConfig::default())?;
//! let predictions = pipeline.forecast(history)?;
//! assert_eq!(predictions.len(), 7);
//! assert_eq!(predictions[0].target_date.to_string(), "2024-03-11");
//! # Ok::<(), forex_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod optimization;
pub mod pipeline;
pub mod synthetic;
pub mod utils;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{DataLoader, HistoricalInput, Observation, TimeSeriesData};
pub use crate::error::{ForecastError, Result};
pub use crate::models::arima::{ArimaModel, ArimaOrder};
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::pipeline::{predict_forex, ForecastPipeline, Prediction};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

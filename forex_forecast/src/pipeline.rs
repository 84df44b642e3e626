//! The forecast pipeline
//!
//! Historical observations go in, dated predictions come out:
//!
//! 1. parse JSON text (or take structured records as-is)
//! 2. stable-sort by timestamp
//! 3. fit an ARIMA model of the configured order
//! 4. forecast `horizon` steps
//! 5. attach target dates and the confidence label
//! 6. serialize to a JSON array
//!
//! Progress is reported through `tracing`; callers decide where it goes.

use crate::config::ForecastConfig;
use crate::data::{DataLoader, HistoricalInput};
use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaModel;
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::utils::future_dates;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Number of leading records echoed in the load diagnostics
const SAMPLE_SIZE: usize = 5;

/// A single dated forecast value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Calendar date the prediction applies to, `YYYY-MM-DD`
    pub target_date: NaiveDate,
    pub predicted_rate: f64,
    /// Constant label from the configuration
    pub confidence: f64,
}

/// Fit-and-forecast pipeline with fixed hyperparameters
#[derive(Debug, Clone, Default)]
pub struct ForecastPipeline {
    config: ForecastConfig,
}

impl ForecastPipeline {
    /// Create a pipeline, rejecting an unusable configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Run the pipeline and return structured predictions.
    ///
    /// Failures are logged and returned unchanged.
    pub fn forecast(&self, input: impl Into<HistoricalInput>) -> Result<Vec<Prediction>> {
        self.run(input.into()).map_err(|err| {
            error!("Error in predict_forex: {}", err);
            err
        })
    }

    /// Run the pipeline and serialize the predictions as a JSON array
    pub fn predict(&self, input: impl Into<HistoricalInput>) -> Result<String> {
        let predictions = self.forecast(input)?;
        serde_json::to_string(&predictions).map_err(|err| {
            error!("Error in predict_forex: {}", err);
            ForecastError::from(err)
        })
    }

    fn run(&self, input: HistoricalInput) -> Result<Vec<Prediction>> {
        let data = DataLoader::load(&input)?;
        info!("Data loaded successfully: {} records", data.len());
        info!("Sample data: {}", serde_json::to_string(data.head(SAMPLE_SIZE))?);

        let model = ArimaModel::with_order(self.config.order);
        let trained = model.train(&data)?;
        info!("Model fitted successfully: {}", trained.name());

        let forecast = trained.forecast(self.config.horizon)?;
        let last_timestamp = data
            .last_timestamp()
            .ok_or_else(|| ForecastError::DataError("Empty time series data".to_string()))?;
        let dates = future_dates(last_timestamp, self.config.horizon, self.config.step())?;

        let predictions: Vec<Prediction> = dates
            .into_iter()
            .zip(forecast.values())
            .map(|(target_date, &predicted_rate)| Prediction {
                target_date,
                predicted_rate,
                confidence: self.config.confidence,
            })
            .collect();

        info!("Predictions generated successfully");
        Ok(predictions)
    }
}

/// Forecast with the default configuration and return the JSON text
pub fn predict_forex(input: impl Into<HistoricalInput>) -> Result<String> {
    ForecastPipeline::default().predict(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_serialization_shape() {
        let prediction = Prediction {
            target_date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            predicted_rate: 1386.5,
            confidence: 0.95,
        };

        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["target_date"], "2024-03-02");
        assert_eq!(json["predicted_rate"], 1386.5);
        assert_eq!(json["confidence"], 0.95);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ForecastConfig::default().with_horizon(0);
        assert!(matches!(
            ForecastPipeline::new(config),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_empty_input_fails() {
        let err = ForecastPipeline::default().forecast("[]").unwrap_err();
        assert!(matches!(err, ForecastError::DataError(_)));
    }
}

//! Forecast configuration

use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaOrder;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Default number of forecast steps
pub const DEFAULT_HORIZON: usize = 7;

/// Confidence label attached to every prediction
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Hyperparameters of the forecast pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// ARIMA order, (5,1,0) by default
    pub order: ArimaOrder,
    /// Number of steps to forecast
    pub horizon: usize,
    /// Constant confidence label. Not derived from the model.
    pub confidence: f64,
    /// Calendar days between consecutive target dates
    pub step_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            order: ArimaOrder::default(),
            horizon: DEFAULT_HORIZON,
            confidence: DEFAULT_CONFIDENCE,
            step_days: 1,
        }
    }
}

impl ForecastConfig {
    pub fn with_order(mut self, order: ArimaOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Spacing between target dates as a duration
    pub fn step(&self) -> Duration {
        Duration::days(i64::from(self.step_days))
    }

    /// Check that the configuration describes a usable forecast
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be at least 1".to_string(),
            ));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence must be between 0 and 1, got {}",
                self.confidence
            )));
        }
        if self.step_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "step_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ForecastConfig::default();
        assert_eq!(config.order, ArimaOrder::new(5, 1, 0));
        assert_eq!(config.horizon, 7);
        assert_eq!(config.confidence, 0.95);
        assert_eq!(config.step(), Duration::days(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ForecastConfig = serde_json::from_str(r#"{"horizon": 3}"#).unwrap();
        assert_eq!(config.horizon, 3);
        assert_eq!(config.order, ArimaOrder::default());
        assert_eq!(config.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ForecastConfig::default().with_horizon(0).validate().is_err());
        assert!(ForecastConfig::default()
            .with_confidence(1.0)
            .validate()
            .is_err());
        assert!(ForecastConfig::default()
            .with_confidence(f64::NAN)
            .validate()
            .is_err());
    }
}

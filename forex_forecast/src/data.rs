//! Exchange-rate observations and the time-ordered series built from them

use crate::error::{ForecastError, Result};
use crate::utils::date_parser;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use statrs::statistics::Statistics;

/// A single exchange-rate observation as delivered by upstream sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Currency code; carried along but not used for modelling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Observed rate
    #[serde(deserialize_with = "deserialize_rate")]
    pub rate: f64,
    /// ISO-8601 timestamp
    pub timestamp: String,
}

impl Observation {
    /// Create a new observation
    pub fn new(currency: impl Into<String>, rate: f64, timestamp: impl Into<String>) -> Self {
        Self {
            currency: Some(currency.into()),
            rate,
            timestamp: timestamp.into(),
        }
    }
}

/// Rates arrive either as JSON numbers or as numeric strings
fn deserialize_rate<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRate {
        Number(f64),
        Text(String),
    }

    match RawRate::deserialize(deserializer)? {
        RawRate::Number(value) => Ok(value),
        RawRate::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("rate '{}' is not numeric", text))),
    }
}

/// Historical data handed to the pipeline
#[derive(Debug, Clone)]
pub enum HistoricalInput {
    /// JSON text holding an array of observations
    Text(String),
    /// Already-structured observations
    Records(Vec<Observation>),
}

impl From<&str> for HistoricalInput {
    fn from(text: &str) -> Self {
        HistoricalInput::Text(text.to_string())
    }
}

impl From<String> for HistoricalInput {
    fn from(text: String) -> Self {
        HistoricalInput::Text(text)
    }
}

impl From<Vec<Observation>> for HistoricalInput {
    fn from(records: Vec<Observation>) -> Self {
        HistoricalInput::Records(records)
    }
}

/// One point of the normalized series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    pub timestamp: DateTime<FixedOffset>,
    pub rate: f64,
}

/// Rate series sorted ascending by timestamp
#[derive(Debug, Clone)]
pub struct TimeSeriesData {
    points: Vec<DataPoint>,
}

/// Data loader for historical observations
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Deserialize a JSON array of observations and build the series
    pub fn from_json(text: &str) -> Result<TimeSeriesData> {
        let records: Vec<Observation> = serde_json::from_str(text)?;
        TimeSeriesData::from_observations(&records)
    }

    /// Build the series from already-structured observations
    pub fn from_records(records: &[Observation]) -> Result<TimeSeriesData> {
        TimeSeriesData::from_observations(records)
    }

    /// Build the series from either input shape
    pub fn load(input: &HistoricalInput) -> Result<TimeSeriesData> {
        match input {
            HistoricalInput::Text(text) => Self::from_json(text),
            HistoricalInput::Records(records) => Self::from_records(records),
        }
    }
}

impl TimeSeriesData {
    /// Parse timestamps and stable-sort observations by instant.
    ///
    /// Equal timestamps keep their input order.
    pub fn from_observations(records: &[Observation]) -> Result<Self> {
        if records.is_empty() {
            return Err(ForecastError::DataError(
                "No observations provided".to_string(),
            ));
        }

        let mut points = records
            .iter()
            .map(|record| {
                if !record.rate.is_finite() {
                    return Err(ForecastError::DataError(format!(
                        "Non-finite rate at {}",
                        record.timestamp
                    )));
                }
                Ok(DataPoint {
                    timestamp: date_parser::parse_timestamp(&record.timestamp)?,
                    rate: record.rate,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        points.sort_by_key(|point| point.timestamp);

        Ok(Self { points })
    }

    /// Create a series from parallel timestamp and rate vectors (for testing)
    pub fn new(timestamps: Vec<DateTime<FixedOffset>>, rates: Vec<f64>) -> Result<Self> {
        if timestamps.len() != rates.len() {
            return Err(ForecastError::ValidationError(format!(
                "Timestamps length ({}) doesn't match rates length ({})",
                timestamps.len(),
                rates.len()
            )));
        }
        if timestamps.is_empty() {
            return Err(ForecastError::DataError(
                "No observations provided".to_string(),
            ));
        }

        let mut points: Vec<DataPoint> = timestamps
            .into_iter()
            .zip(rates)
            .map(|(timestamp, rate)| DataPoint { timestamp, rate })
            .collect();
        points.sort_by_key(|point| point.timestamp);

        Ok(Self { points })
    }

    /// Get the sorted points
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Get the first `n` points
    pub fn head(&self, n: usize) -> &[DataPoint] {
        &self.points[..n.min(self.points.len())]
    }

    /// Get the rates in timestamp order
    pub fn rates(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.rate).collect()
    }

    /// Get the timestamps in ascending order
    pub fn timestamps(&self) -> Vec<DateTime<FixedOffset>> {
        self.points.iter().map(|point| point.timestamp).collect()
    }

    /// Latest timestamp in the series
    pub fn last_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.points.last().map(|point| point.timestamp)
    }

    /// Check if the time series is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get the length of the time series
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Calculate the mean of the rates
    pub fn mean(&self) -> Result<f64> {
        if self.points.is_empty() {
            return Err(ForecastError::DataError("No rates available".to_string()));
        }
        Ok(self.points.iter().map(|point| point.rate).mean())
    }

    /// Calculate the sample standard deviation of the rates
    pub fn std_dev(&self) -> Result<f64> {
        if self.points.len() < 2 {
            return Err(ForecastError::DataError(
                "Standard deviation needs at least two rates".to_string(),
            ));
        }
        Ok(self.points.iter().map(|point| point.rate).std_dev())
    }
}

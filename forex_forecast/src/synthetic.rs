//! Synthetic exchange-rate data for running without input

use crate::data::Observation;
use crate::error::{ForecastError, Result};
use chrono::{Duration, Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Shape of the generated dataset
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    /// Number of daily observations
    pub days: usize,
    pub base_rate: f64,
    /// Standard deviation of the Gaussian noise around `base_rate`
    pub noise_std_dev: f64,
    pub currency: String,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            days: 90,
            base_rate: 1386.85,
            noise_std_dev: 1.0,
            currency: "USD".to_string(),
        }
    }
}

/// Generate one observation per day going backward from `anchor`.
///
/// The first record is stamped `anchor`, the last `anchor - (days - 1)`.
pub fn generate<R: Rng + ?Sized>(
    config: &SyntheticConfig,
    anchor: NaiveDateTime,
    rng: &mut R,
) -> Result<Vec<Observation>> {
    let noise = Normal::new(0.0, config.noise_std_dev)
        .map_err(|e| ForecastError::InvalidParameter(format!("noise std dev: {}", e)))?;

    (0..config.days)
        .map(|i| {
            let timestamp = anchor
                .checked_sub_signed(Duration::days(i as i64))
                .ok_or_else(|| {
                    ForecastError::ValidationError(format!("Day {} before {} is out of range", i, anchor))
                })?;
            Ok(Observation::new(
                config.currency.clone(),
                config.base_rate + noise.sample(rng),
                timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            ))
        })
        .collect()
}

/// Default 90-day dataset anchored at the current local time.
///
/// A seed makes the noise reproducible.
pub fn generate_test_data(seed: Option<u64>) -> Result<Vec<Observation>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate(
        &SyntheticConfig::default(),
        Local::now().naive_local(),
        &mut rng,
    )
}

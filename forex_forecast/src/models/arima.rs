//! ARIMA models for time series forecasting
//!
//! Coefficients are estimated by conditional least squares on the
//! differenced series. Pure AR specifications are solved directly; models
//! with a moving-average part minimize the conditional sum of squares with
//! Nelder-Mead, starting from the AR least-squares fit.

use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::optimization::{least_squares, nelder_mead, NelderMeadConfig};
use crate::utils::{difference, integrate};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::f64::consts::PI;
use std::fmt;
use tracing::debug;

/// Diagonal loading for the AR normal equations
const RIDGE: f64 = 1e-8;

/// Bound on AR and MA coefficients during CSS optimization
const COEFFICIENT_BOUND: f64 = 0.99;

/// ARIMA order (p, d, q)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// MA order
    pub q: usize,
}

impl ArimaOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(5, 1, 0)
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)
    }
}

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    order: ArimaOrder,
    /// Estimate a constant on the differenced scale
    include_constant: bool,
    optimizer: NelderMeadConfig,
}

/// Estimated ARIMA coefficients
#[derive(Debug, Clone, PartialEq)]
struct Coefficients {
    constant: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
}

impl Coefficients {
    /// Unpack `[constant?, ar..., ma...]`
    fn from_params(params: &[f64], order: ArimaOrder, include_constant: bool) -> Self {
        let k = usize::from(include_constant);
        Self {
            constant: if include_constant { params[0] } else { 0.0 },
            ar: params[k..k + order.p].to_vec(),
            ma: params[k + order.p..k + order.p + order.q].to_vec(),
        }
    }

    /// One-step prediction of `w[t]` from the values and errors before `t`
    fn predict_at(&self, w: &[f64], errors: &[f64], t: usize) -> f64 {
        let mut prediction = self.constant;
        for (i, phi) in self.ar.iter().enumerate() {
            prediction += phi * w[t - 1 - i];
        }
        for (j, theta) in self.ma.iter().enumerate() {
            if t > j {
                prediction += theta * errors[t - 1 - j];
            }
        }
        prediction
    }

    /// Conditional residuals; the first `p` entries are zero
    fn residuals(&self, w: &[f64]) -> Vec<f64> {
        let mut errors = vec![0.0; w.len()];
        for t in self.ar.len()..w.len() {
            errors[t] = w[t] - self.predict_at(w, &errors, t);
        }
        errors
    }
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    name: String,
    order: ArimaOrder,
    coefficients: Coefficients,
    /// Series on its original scale
    history: Vec<f64>,
    /// Series after `d` rounds of differencing
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    sigma2: f64,
    log_likelihood: f64,
    aic: f64,
    bic: f64,
}

impl ArimaModel {
    /// Create a new ARIMA model.
    ///
    /// A constant is estimated only when `d == 0`.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self::with_order(ArimaOrder::new(p, d, q))
    }

    /// Create a model from an [`ArimaOrder`]
    pub fn with_order(order: ArimaOrder) -> Self {
        Self {
            name: format!("ARIMA{}", order),
            order,
            include_constant: order.d == 0,
            optimizer: NelderMeadConfig::default(),
        }
    }

    /// Override whether a constant is estimated
    pub fn with_constant(mut self, include_constant: bool) -> Self {
        self.include_constant = include_constant;
        self
    }

    /// Override the optimizer settings used when `q > 0`
    pub fn with_optimizer(mut self, optimizer: NelderMeadConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn includes_constant(&self) -> bool {
        self.include_constant
    }

    /// Smallest series length this specification can be fitted on.
    ///
    /// The differenced series needs one value more than there are
    /// coefficients; short series are fitted with a padded pre-sample.
    pub fn min_observations(&self) -> usize {
        self.order.d + self.num_params() + 1
    }

    fn num_params(&self) -> usize {
        self.order.p + self.order.q + usize::from(self.include_constant)
    }

    /// Least-squares fit of `[constant?, ar...]`.
    ///
    /// Rows start at `t = p` when that leaves more rows than coefficients.
    /// Otherwise every `t` gets a row and lags before the start of the
    /// series take the pre-sample value: zero, or the series mean when a
    /// constant is estimated.
    fn fit_ar(&self, w: &[f64]) -> Result<Vec<f64>> {
        let p = self.order.p;
        let k = usize::from(self.include_constant);
        let cols = k + p;

        let conditional = w.len().saturating_sub(p) > cols;
        let first = if conditional { p } else { 0 };
        let presample = if self.include_constant {
            w.iter().mean()
        } else {
            0.0
        };

        let nrows = w.len() - first;
        let design = DMatrix::from_fn(nrows, cols, |row, col| {
            let t = first + row;
            if col < k {
                1.0
            } else {
                let lag = col - k + 1;
                if t >= lag {
                    w[t - lag]
                } else {
                    presample
                }
            }
        });
        let targets = DVector::from_column_slice(&w[first..]);

        least_squares(&design, &targets, RIDGE)
    }

    /// Minimize the conditional sum of squares over all coefficients
    fn fit_css(&self, w: &[f64]) -> Result<Coefficients> {
        let order = self.order;
        let include_constant = self.include_constant;

        let mut initial = self.fit_ar(w)?;
        initial.extend(std::iter::repeat(0.0).take(order.q));

        let k = usize::from(include_constant);
        let bounds: Vec<(f64, f64)> = (0..initial.len())
            .map(|i| {
                if i < k {
                    (f64::NEG_INFINITY, f64::INFINITY)
                } else {
                    (-COEFFICIENT_BOUND, COEFFICIENT_BOUND)
                }
            })
            .collect();

        let result = nelder_mead(
            |params| {
                let coefficients = Coefficients::from_params(params, order, include_constant);
                coefficients.residuals(w)[order.p..]
                    .iter()
                    .map(|e| e * e)
                    .sum::<f64>()
            },
            &initial,
            Some(&bounds),
            &self.optimizer,
        );

        if !result.optimal_value.is_finite() {
            return Err(ForecastError::ModelError(
                "Conditional sum of squares is not finite".to_string(),
            ));
        }
        if !result.converged {
            return Err(ForecastError::ConvergenceError {
                iterations: result.iterations,
            });
        }

        Ok(Coefficients::from_params(
            &result.optimal_point,
            order,
            include_constant,
        ))
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, data: &TimeSeriesData) -> Result<TrainedArimaModel> {
        let history = data.rates();
        let needed = self.min_observations();
        if history.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: history.len(),
            });
        }

        let differenced = difference(&history, self.order.d);

        let coefficients = if self.order.q == 0 {
            let params = self.fit_ar(&differenced)?;
            Coefficients::from_params(&params, self.order, self.include_constant)
        } else {
            self.fit_css(&differenced)?
        };

        let residuals = coefficients.residuals(&differenced);
        let effective = &residuals[self.order.p..];
        let sigma2 = effective.iter().map(|e| e * e).mean();
        if !sigma2.is_finite() {
            return Err(ForecastError::ModelError(
                "Residual variance is not finite".to_string(),
            ));
        }

        // sigma2 counts as an estimated parameter
        let n_eff = effective.len() as f64;
        let k = (self.num_params() + 1) as f64;
        let log_likelihood = -0.5 * n_eff * ((2.0 * PI * sigma2).ln() + 1.0);
        let aic = -2.0 * log_likelihood + 2.0 * k;
        let bic = -2.0 * log_likelihood + k * n_eff.ln();

        debug!(
            model = %self.name,
            nobs = history.len(),
            constant = coefficients.constant,
            ar = ?coefficients.ar,
            ma = ?coefficients.ma,
            sigma2,
            aic,
            bic,
            "ARIMA fit complete"
        );

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            order: self.order,
            coefficients,
            history,
            differenced,
            residuals,
            sigma2,
            log_likelihood,
            aic,
            bic,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizons: usize) -> Result<ForecastResult> {
        if horizons == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        let mut w = self.differenced.clone();
        let mut errors = self.residuals.clone();
        for _ in 0..horizons {
            let next = self.coefficients.predict_at(&w, &errors, w.len());
            w.push(next);
            // future shocks have zero expectation
            errors.push(0.0);
        }

        let values = integrate(&w[self.differenced.len()..], &self.history, self.order.d);
        ForecastResult::new(values, horizons)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Constant on the differenced scale (zero when not estimated)
    pub fn constant(&self) -> f64 {
        self.coefficients.constant
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.coefficients.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.coefficients.ma
    }

    /// Conditional residuals on the differenced scale
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Number of observations the model was fitted on
    pub fn nobs(&self) -> usize {
        self.history.len()
    }

    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }
}

//! Numerical routines behind model estimation

use crate::error::{ForecastError, Result};
use nalgebra::{DMatrix, DVector};
use std::cmp::Ordering;

/// Solve the linear least-squares problem `min ||X b - y||²`.
///
/// The normal equations `(X'X + ridge I) b = X'y` are solved by Cholesky
/// decomposition. With `ridge == 0.0` a rank-deficient design is reported
/// as a model error.
pub fn least_squares(design: &DMatrix<f64>, y: &DVector<f64>, ridge: f64) -> Result<Vec<f64>> {
    if design.nrows() != y.len() {
        return Err(ForecastError::ValidationError(format!(
            "Design matrix has {} rows but target has {} values",
            design.nrows(),
            y.len()
        )));
    }

    let k = design.ncols();
    if k == 0 {
        return Ok(Vec::new());
    }
    if design.nrows() < k {
        return Err(ForecastError::InsufficientData {
            needed: k,
            got: design.nrows(),
        });
    }

    let xtx = design.tr_mul(design) + DMatrix::identity(k, k) * ridge;
    let xty = design.tr_mul(y);

    let singular = || {
        ForecastError::ModelError(
            "Least squares failed: normal equations are singular".to_string(),
        )
    };

    // Pivots below this are rounding noise relative to the largest diagonal entry
    let floor = xtx.diagonal().amax() * 1e-12;
    let cholesky = xtx.cholesky().ok_or_else(singular)?;
    let pivots_ok = cholesky
        .l_dirty()
        .diagonal()
        .iter()
        .all(|l| l.is_finite() && l * l > floor);
    if !pivots_ok {
        return Err(singular());
    }

    let beta = cholesky.solve(&xty);
    if beta.iter().any(|b| !b.is_finite()) {
        return Err(singular());
    }
    Ok(beta.iter().copied().collect())
}

/// Result of Nelder-Mead optimization
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The optimal point found
    pub optimal_point: Vec<f64>,
    /// Objective value at the optimal point
    pub optimal_value: f64,
    /// Number of iterations performed
    pub iterations: usize,
    /// Whether the simplex met the tolerance
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    pub max_iter: usize,
    pub tolerance: f64,
    /// Reflection coefficient
    pub alpha: f64,
    /// Expansion coefficient
    pub gamma: f64,
    /// Contraction coefficient
    pub rho: f64,
    /// Shrink coefficient
    pub sigma: f64,
    /// Initial simplex step
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 2000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Minimize `objective` with the Nelder-Mead simplex method.
///
/// Points are clamped into `bounds` when given. Ties and NaN objective
/// values sort as equal.
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: Vec::new(),
            optimal_value: objective(initial),
            iterations: 0,
            converged: true,
        };
    }

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(clamp(initial.to_vec(), bounds));
    for i in 0..n {
        let mut vertex = initial.to_vec();
        vertex[i] += if initial[i].abs() > 1e-10 {
            config.initial_step * initial[i].abs()
        } else {
            config.initial_step
        };
        simplex.push(clamp(vertex, bounds));
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        if (values[worst] - values[best]).abs() <= config.tolerance * (1.0 + values[best].abs()) {
            converged = true;
            break;
        }

        let centroid = centroid(&simplex, worst);

        let reflected = clamp(
            lerp(&centroid, &simplex[worst], -config.alpha),
            bounds,
        );
        let reflected_value = objective(&reflected);

        if reflected_value < values[best] {
            let expanded = clamp(lerp(&centroid, &reflected, config.gamma), bounds);
            let expanded_value = objective(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        let (contracted, threshold) = if reflected_value < values[worst] {
            (lerp(&centroid, &reflected, config.rho), reflected_value)
        } else {
            (lerp(&centroid, &simplex[worst], config.rho), values[worst])
        };
        let contracted = clamp(contracted, bounds);
        let contracted_value = objective(&contracted);
        if contracted_value < threshold {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        // Shrink towards the best vertex
        let anchor = simplex[best].clone();
        for i in 0..=n {
            if i != best {
                let shrunk = clamp(lerp(&anchor, &simplex[i], config.sigma), bounds);
                values[i] = objective(&shrunk);
                simplex[i] = shrunk;
            }
        }
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);

    NelderMeadResult {
        optimal_point: simplex[best].clone(),
        optimal_value: values[best],
        iterations,
        converged,
    }
}

fn centroid(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let n = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut c = vec![0.0; n];
    for (i, vertex) in simplex.iter().enumerate() {
        if i != exclude {
            for (acc, value) in c.iter_mut().zip(vertex) {
                *acc += value;
            }
        }
    }
    c.iter_mut().for_each(|v| *v /= count);
    c
}

/// `from + t * (to - from)`
fn lerp(from: &[f64], to: &[f64], t: f64) -> Vec<f64> {
    from.iter().zip(to).map(|(f, p)| f + t * (p - f)).collect()
}

fn clamp(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(bounds) = bounds {
        for (value, &(lo, hi)) in point.iter_mut().zip(bounds) {
            *value = value.clamp(lo, hi);
        }
    }
    point
}

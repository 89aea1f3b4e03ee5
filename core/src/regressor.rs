//! Ridge regression over sparse features.
//!
//! Minimizes `||y - Xw - b||^2 + alpha * ||w||^2` with an unpenalized
//! intercept. Centering is implicit so the sparse rows are never densified;
//! the normal equations are solved by conjugate gradient starting from zero.

use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};
use crate::SparseVector;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RidgeConfig {
    pub alpha: f64,
    /// Stop once `||r|| <= tolerance * ||b||`.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RidgeConfig {
    fn default() -> Self {
        Self { alpha: 1.0, tolerance: 1e-10, max_iterations: 5000 }
    }
}

impl RidgeConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(PriceError::InvalidConfig(format!("alpha must be finite and >= 0, got {}", self.alpha)));
        }
        if !(self.tolerance > 0.0) {
            return Err(PriceError::InvalidConfig(format!("tolerance must be > 0, got {}", self.tolerance)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeRegressor {
    pub alpha: f64,
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// Centered design matrix `X - 1 * mean^T`, applied without materializing it.
struct Centered<'a> {
    rows: &'a [SparseVector],
    mean: Vec<f64>,
}

impl<'a> Centered<'a> {
    fn new(rows: &'a [SparseVector], dim: usize) -> Self {
        let mut mean = vec![0.0; dim];
        for row in rows {
            for (i, v) in row.iter() {
                mean[i as usize] += v;
            }
        }
        let n = rows.len() as f64;
        for m in mean.iter_mut() { *m /= n; }
        Self { rows, mean }
    }

    /// `X_c v`
    fn apply(&self, v: &[f64]) -> Vec<f64> {
        let shift = dot(&self.mean, v);
        self.rows.iter().map(|r| r.dot(v) - shift).collect()
    }

    /// `X_c^T u`
    fn apply_transpose(&self, u: &[f64]) -> Vec<f64> {
        let total: f64 = u.iter().sum();
        let mut out: Vec<f64> = self.mean.iter().map(|m| -m * total).collect();
        for (row, &ui) in self.rows.iter().zip(u) {
            for (i, v) in row.iter() {
                out[i as usize] += v * ui;
            }
        }
        out
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl RidgeRegressor {
    /// Fit on `rows` (each with indices `< dim`) against `targets`.
    pub fn fit(rows: &[SparseVector], targets: &[f64], dim: usize, config: RidgeConfig) -> Result<Self> {
        config.validate()?;
        if rows.is_empty() {
            return Err(PriceError::EmptyTrainingSet);
        }
        if rows.len() != targets.len() {
            return Err(PriceError::InvalidConfig(format!(
                "{} feature rows but {} targets",
                rows.len(),
                targets.len()
            )));
        }

        let y_mean = targets.iter().sum::<f64>() / targets.len() as f64;
        let y_centered: Vec<f64> = targets.iter().map(|y| y - y_mean).collect();
        let x = Centered::new(rows, dim);

        let b = x.apply_transpose(&y_centered);
        let b_norm = dot(&b, &b).sqrt();
        let mut w = vec![0.0; dim];

        if dim > 0 && b_norm > 0.0 {
            let mut r = b.clone();
            let mut p = r.clone();
            let mut rs = dot(&r, &r);
            let mut iterations = 0;
            while iterations < config.max_iterations && rs.sqrt() > config.tolerance * b_norm {
                let mut ap = x.apply_transpose(&x.apply(&p));
                for (a, pi) in ap.iter_mut().zip(&p) { *a += config.alpha * pi; }
                let p_ap = dot(&p, &ap);
                if p_ap <= 0.0 {
                    break;
                }
                let step = rs / p_ap;
                for ((wi, ri), (pi, api)) in w.iter_mut().zip(r.iter_mut()).zip(p.iter().zip(&ap)) {
                    *wi += step * pi;
                    *ri -= step * api;
                }
                let rs_next = dot(&r, &r);
                let beta = rs_next / rs;
                for (pi, ri) in p.iter_mut().zip(&r) { *pi = ri + beta * *pi; }
                rs = rs_next;
                iterations += 1;
            }
            tracing::debug!(iterations, residual = rs.sqrt(), "ridge solver finished");
            if iterations == config.max_iterations {
                tracing::warn!(iterations, "ridge solver hit the iteration limit before converging");
            }
        }

        let bias = y_mean - dot(&x.mean, &w);
        Ok(Self { alpha: config.alpha, weights: w, bias })
    }

    pub fn dim(&self) -> usize { self.weights.len() }

    pub fn predict(&self, features: &SparseVector) -> f64 {
        features.dot(&self.weights) + self.bias
    }
}

//! Evaluation metrics for the trained model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Holdout metrics returned by a training pass, together with the fitted
/// parameters so callers can display or store them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Mean squared error on the holdout partition
    pub mse: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Fitted coefficients, one per feature column
    pub coefficients: Vec<f64>,
    /// Fitted intercept
    pub intercept: f64,
}

impl TrainingMetrics {
    /// Compute holdout metrics from actual and predicted values. Callers
    /// guarantee equal, non-zero lengths.
    pub fn evaluate(
        actual: &[f64],
        predicted: &[f64],
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Self {
        debug_assert_eq!(actual.len(), predicted.len());
        let n = actual.len() as f64;

        let mse = actual
            .iter()
            .zip(predicted)
            .map(|(a, p)| (a - p).powi(2))
            .sum::<f64>()
            / n;
        let rmse = mse.sqrt();

        let mean_actual = actual.iter().sum::<f64>() / n;
        let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
        let ss_res: f64 = mse * n;
        let r2 = if ss_tot.abs() < 1e-10 {
            0.0
        } else {
            1.0 - ss_res / ss_tot
        };

        Self {
            mse,
            rmse,
            r2,
            coefficients,
            intercept,
        }
    }
}

impl fmt::Display for TrainingMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MSE={:.4}, RMSE={:.4}, R²={:.4}",
            self.mse, self.rmse, self.r2
        )
    }
}

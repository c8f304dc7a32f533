//! Standardization of feature columns
//!
//! Zero-mean/unit-variance scaling with parameters fitted once at training
//! time and persisted alongside the model. Inference reuses the persisted
//! parameters unchanged so that transform output is bit-stable.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PredictionError, Result};
use crate::storage;

/// Columns with a standard deviation below this are treated as constant and
/// left at their centered value instead of being divided by ~0.
const MIN_SCALE: f64 = 1e-12;

/// Fitted standardization parameters, one mean/scale pair per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub columns: Vec<String>,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit over a batch: per-column mean and population standard deviation.
    /// Constant columns get scale 1.0 so they standardize to exactly 0.
    pub fn fit(columns: &[&str], rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(PredictionError::InvalidInput(
                "cannot fit scaler on an empty batch".into(),
            ));
        }
        let n = rows.len() as f64;
        let width = columns.len();

        let mut means = vec![0.0; width];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut scales = vec![0.0; width];
        for row in rows {
            for ((scale, mean), value) in scales.iter_mut().zip(&means).zip(row) {
                *scale += (value - mean).powi(2);
            }
        }
        for scale in &mut scales {
            *scale = (*scale / n).sqrt();
            if *scale < MIN_SCALE {
                *scale = 1.0;
            }
        }

        Ok(Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            means,
            scales,
        })
    }

    /// Apply the fitted parameters to a batch. The incoming column set must
    /// be the one the scaler was fitted with, in the same order.
    pub fn apply(&self, columns: &[&str], rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        if self.columns != columns {
            return Err(PredictionError::InvalidInput(format!(
                "feature columns {:?} do not match fitted scaler columns {:?}",
                columns, self.columns
            )));
        }
        Ok(rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.means)
                    .zip(&self.scales)
                    .map(|((value, mean), scale)| (value - mean) / scale)
                    .collect()
            })
            .collect())
    }

    /// Persist the parameters, overwriting any previous fit.
    pub fn save(&self, path: &Path) -> Result<()> {
        storage::save_json(path, self)?;
        tracing::debug!(path = %path.display(), "scaler parameters persisted");
        Ok(())
    }

    /// Load previously persisted parameters. A missing blob means no
    /// training pass has happened yet.
    pub fn load(path: &Path) -> Result<Self> {
        match storage::load_json(path)? {
            Some(scaler) => Ok(scaler),
            None => Err(PredictionError::ScalerNotFound),
        }
    }
}

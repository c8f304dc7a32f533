//! Linear consumption model
//!
//! Train/evaluate/persist/reload lifecycle around an ordinary least squares
//! fit. Training shuffles with a fixed seed and holds out 20% of the rows
//! for evaluation; the returned coefficients are fitted on the remaining
//! 80%. State is a single JSON blob so a fresh process picks up the last
//! trained model on startup.

pub mod metrics;
pub mod ols;

pub use metrics::TrainingMetrics;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PredictionError, Result};
use crate::pipeline::FeatureMatrix;
use crate::storage;

/// Split/seed parameters for a training pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingOptions {
    /// Fraction of rows held out for evaluation
    pub holdout_ratio: f64,
    /// Shuffle seed, fixed for reproducible splits
    pub seed: u64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            holdout_ratio: 0.2,
            seed: 42,
        }
    }
}

/// Persisted model state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ModelState {
    coefficients: Vec<f64>,
    intercept: f64,
    trained: bool,
}

/// Linear regression model with durable state.
#[derive(Debug)]
pub struct EnergyModel {
    state: ModelState,
    path: PathBuf,
}

impl EnergyModel {
    /// Fresh, untrained model persisting to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            state: ModelState::default(),
            path: path.into(),
        }
    }

    /// Model that loads persisted state from `path` when present. Absence
    /// of a stored blob is not an error; the model just stays untrained.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut model = Self::new(path);
        model.load()?;
        Ok(model)
    }

    pub fn is_trained(&self) -> bool {
        self.state.trained
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fit on a shuffled 80% partition, evaluate on the 20% holdout,
    /// persist the fitted state and return the holdout metrics.
    pub fn train(
        &mut self,
        matrix: &FeatureMatrix,
        targets: &[f64],
        options: &TrainingOptions,
    ) -> Result<TrainingMetrics> {
        let (state, metrics) = Self::fit_state(matrix, targets, options)?;
        self.install(state)?;
        tracing::info!(rows = matrix.n_rows(), %metrics, "model trained");
        Ok(metrics)
    }

    /// Compute a fit without touching the live state or durable storage.
    /// Every failure mode of a training pass (length mismatch, too few
    /// rows, a degenerate solve) happens here, before anything is
    /// committed.
    pub(crate) fn fit_state(
        matrix: &FeatureMatrix,
        targets: &[f64],
        options: &TrainingOptions,
    ) -> Result<(ModelState, TrainingMetrics)> {
        if matrix.n_rows() != targets.len() {
            return Err(PredictionError::InvalidInput(format!(
                "feature rows ({}) and targets ({}) differ in length",
                matrix.n_rows(),
                targets.len()
            )));
        }
        if matrix.n_rows() < 2 {
            return Err(PredictionError::InsufficientData {
                rows: matrix.n_rows(),
                min: 2,
            });
        }

        let (train_idx, test_idx) = split_indices(matrix.n_rows(), options);

        let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| matrix.rows[i].clone()).collect();
        let train_y: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();

        let (coefficients, intercept) = ols::fit(&train_rows, &train_y)?;

        let holdout_actual: Vec<f64> = test_idx.iter().map(|&i| targets[i]).collect();
        let holdout_predicted: Vec<f64> = test_idx
            .iter()
            .map(|&i| predict_row(&matrix.rows[i], &coefficients, intercept))
            .collect();

        let metrics = TrainingMetrics::evaluate(
            &holdout_actual,
            &holdout_predicted,
            coefficients.clone(),
            intercept,
        );

        let state = ModelState {
            coefficients,
            intercept,
            trained: true,
        };
        Ok((state, metrics))
    }

    /// Adopt a fitted state and persist it.
    pub(crate) fn install(&mut self, state: ModelState) -> Result<()> {
        self.state = state;
        self.save()
    }

    /// Predict one value per feature row, unrounded.
    pub fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>> {
        if !self.state.trained {
            return Err(PredictionError::ModelNotTrained);
        }
        if matrix.n_columns() != self.state.coefficients.len() {
            return Err(PredictionError::InvalidInput(format!(
                "expected {} feature columns, got {}",
                self.state.coefficients.len(),
                matrix.n_columns()
            )));
        }
        Ok(matrix
            .rows
            .iter()
            .map(|row| predict_row(row, &self.state.coefficients, self.state.intercept))
            .collect())
    }

    /// Relative importance of each feature: `|coef| / Σ|coef|`.
    pub fn feature_importance(&self) -> Result<Vec<f64>> {
        if !self.state.trained {
            return Err(PredictionError::ModelNotTrained);
        }
        let total: f64 = self.state.coefficients.iter().map(|c| c.abs()).sum();
        if total == 0.0 {
            return Ok(vec![0.0; self.state.coefficients.len()]);
        }
        Ok(self
            .state
            .coefficients
            .iter()
            .map(|c| c.abs() / total)
            .collect())
    }

    /// Persist `(coefficients, intercept, trained)` atomically.
    pub fn save(&self) -> Result<()> {
        storage::save_json(&self.path, &self.state)?;
        tracing::debug!(path = %self.path.display(), "model state persisted");
        Ok(())
    }

    /// Restore persisted state if any exists.
    pub fn load(&mut self) -> Result<()> {
        if let Some(state) = storage::load_json(&self.path)? {
            self.state = state;
        }
        Ok(())
    }
}

fn predict_row(row: &[f64], coefficients: &[f64], intercept: f64) -> f64 {
    row.iter()
        .zip(coefficients)
        .map(|(x, c)| x * c)
        .sum::<f64>()
        + intercept
}

/// Deterministic shuffled split. The holdout gets `ceil`-rounded so two rows
/// still produce a non-empty holdout.
fn split_indices(n: usize, options: &TrainingOptions) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(options.seed);
    indices.shuffle(&mut rng);

    let holdout = ((n as f64 * options.holdout_ratio).ceil() as usize).clamp(1, n - 1);
    let test = indices.split_off(n - holdout);
    (indices, test)
}

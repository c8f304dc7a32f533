//! Feature pipeline
//!
//! Deterministic transform from raw records to the standardized feature
//! matrix the model consumes. Training fits and persists fresh scaler
//! parameters; inference applies the persisted parameters unchanged.

pub mod features;
pub mod scaler;

pub use features::FEATURE_COLUMNS;
pub use scaler::StandardScaler;

use std::path::{Path, PathBuf};

use crate::domain::RawRecord;
use crate::error::{PredictionError, Result};

/// Standardized feature matrix with its column names.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Stateful (fitted) transform from raw records to feature matrices.
///
/// The fitted scaler lives at `scaler_path`; it is written on every
/// `training=true` call and read on every `training=false` call, so a fresh
/// pipeline instance picks up the last fit automatically.
pub struct FeaturePipeline {
    scaler_path: PathBuf,
}

impl FeaturePipeline {
    pub fn new(scaler_path: impl Into<PathBuf>) -> Self {
        Self {
            scaler_path: scaler_path.into(),
        }
    }

    pub fn scaler_path(&self) -> &Path {
        &self.scaler_path
    }

    /// Transform a batch of records into a standardized feature matrix plus
    /// the target vector when the batch carries consumption values.
    ///
    /// With `training=true` a new scaler is fitted over the batch and
    /// persisted, overwriting any previous parameters. With
    /// `training=false` the persisted parameters are applied unchanged;
    /// absence of a fitted scaler fails with [`PredictionError::ScalerNotFound`].
    pub fn transform(
        &self,
        records: &[RawRecord],
        training: bool,
    ) -> Result<(FeatureMatrix, Option<Vec<f64>>)> {
        if training {
            let (matrix, targets, scaler) = self.fit_transform(records)?;
            scaler.save(&self.scaler_path)?;
            Ok((matrix, targets))
        } else {
            let (raw_rows, targets) = prepare(records)?;
            let scaler = StandardScaler::load(&self.scaler_path)?;
            let rows = scaler.apply(&FEATURE_COLUMNS, &raw_rows)?;
            Ok((
                FeatureMatrix {
                    columns: scaler.columns,
                    rows,
                },
                targets,
            ))
        }
    }

    /// Fit a fresh scaler over the batch and transform with it, without
    /// touching durable storage. Callers that train a model on the result
    /// persist the returned scaler only once the whole training pass has
    /// succeeded, so a failure midway leaves the previous fit intact.
    pub fn fit_transform(
        &self,
        records: &[RawRecord],
    ) -> Result<(FeatureMatrix, Option<Vec<f64>>, StandardScaler)> {
        let (raw_rows, targets) = prepare(records)?;
        let scaler = StandardScaler::fit(&FEATURE_COLUMNS, &raw_rows)?;
        let rows = scaler.apply(&FEATURE_COLUMNS, &raw_rows)?;
        tracing::info!(rows = records.len(), "fitted standardization parameters");
        Ok((
            FeatureMatrix {
                columns: scaler.columns.clone(),
                rows,
            },
            targets,
            scaler,
        ))
    }
}

fn prepare(records: &[RawRecord]) -> Result<(Vec<Vec<f64>>, Option<Vec<f64>>)> {
    if records.is_empty() {
        return Err(PredictionError::InvalidInput(
            "cannot transform an empty batch".into(),
        ));
    }
    for record in records {
        record.validate()?;
    }
    let targets = split_targets(records)?;
    let raw_rows = records.iter().map(features::feature_row).collect();
    Ok((raw_rows, targets))
}

/// Pull the consumption column out of the batch. Either every record has a
/// target (training data) or none does (inference data); mixed batches are
/// rejected rather than guessed at.
fn split_targets(records: &[RawRecord]) -> Result<Option<Vec<f64>>> {
    let with_target = records.iter().filter(|r| r.consumption.is_some()).count();
    if with_target == 0 {
        return Ok(None);
    }
    if with_target != records.len() {
        return Err(PredictionError::InvalidInput(format!(
            "{with_target} of {} records carry a consumption value; batches must be all-or-none",
            records.len()
        )));
    }
    Ok(Some(
        records.iter().filter_map(|r| r.consumption).collect(),
    ))
}

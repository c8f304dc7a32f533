//! Prediction service facade
//!
//! Owns the fitted pipeline and model behind one handle, constructed once
//! at process startup with an explicit load of any persisted state. Train
//! takes the write lock (single-writer discipline); predictions run under
//! the read lock against the stable, already-persisted state.

use parking_lot::RwLock;
use std::path::{Path, PathBuf};

use crate::domain::RawRecord;
use crate::error::{PredictionError, Result};
use crate::model::{EnergyModel, TrainingMetrics, TrainingOptions};
use crate::pipeline::{FeaturePipeline, FEATURE_COLUMNS};

pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "model.json";

pub struct PredictionService {
    pipeline: FeaturePipeline,
    model: RwLock<EnergyModel>,
    options: TrainingOptions,
}

impl PredictionService {
    /// Open the service over a storage directory, loading any previously
    /// persisted model state.
    pub fn open(storage_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_options(storage_dir, TrainingOptions::default())
    }

    pub fn open_with_options(
        storage_dir: impl Into<PathBuf>,
        options: TrainingOptions,
    ) -> Result<Self> {
        let dir = storage_dir.into();
        let model = EnergyModel::open(dir.join(MODEL_FILE))?;
        if model.is_trained() {
            tracing::info!(dir = %dir.display(), "loaded persisted model state");
        } else {
            tracing::warn!(dir = %dir.display(), "no persisted model state; training required");
        }
        Ok(Self {
            pipeline: FeaturePipeline::new(dir.join(SCALER_FILE)),
            model: RwLock::new(model),
            options,
        })
    }

    pub fn is_trained(&self) -> bool {
        self.model.read().is_trained()
    }

    pub fn scaler_path(&self) -> &Path {
        self.pipeline.scaler_path()
    }

    /// Retrain from a batch of records carrying consumption values.
    ///
    /// Scaler and model are fitted in memory first; durable state is only
    /// written after both fits succeed, so a failed pass (missing targets,
    /// too few rows, a degenerate solve) leaves the previously persisted
    /// scaler/model pair intact and predictions unchanged.
    pub fn train(&self, records: &[RawRecord]) -> Result<TrainingMetrics> {
        let mut model = self.model.write();

        let (matrix, targets, scaler) = self.pipeline.fit_transform(records)?;
        let targets = targets.ok_or_else(|| {
            PredictionError::MissingColumn(vec!["consumption".into()])
        })?;
        let (state, metrics) = EnergyModel::fit_state(&matrix, &targets, &self.options)?;

        scaler.save(self.pipeline.scaler_path())?;
        model.install(state)?;
        tracing::info!(rows = records.len(), %metrics, "model trained");
        Ok(metrics)
    }

    /// Predict consumption for a batch of records, one value per record.
    pub fn predict(&self, records: &[RawRecord]) -> Result<Vec<f64>> {
        let model = self.model.read();
        let (matrix, _) = self.pipeline.transform(records, false)?;
        model.predict(&matrix)
    }

    /// Predict consumption for a single record.
    pub fn predict_one(&self, record: &RawRecord) -> Result<f64> {
        let predictions = self.predict(std::slice::from_ref(record))?;
        Ok(predictions[0])
    }

    /// Named relative feature importances from the trained model.
    pub fn feature_importance(&self) -> Result<Vec<(String, f64)>> {
        let importance = self.model.read().feature_importance()?;
        Ok(FEATURE_COLUMNS
            .iter()
            .map(|name| name.to_string())
            .zip(importance)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn training_records() -> Vec<RawRecord> {
        (0..30u32)
            .map(|i| {
                let area = 200.0 + 20.0 * i as f64;
                let occupancy = 10 + i;
                let day = (i % 7) as u8;
                let hour = (i % 24) as u8;
                let consumption = 0.5 * area
                    + 2.0 * occupancy as f64
                    + 1.5 * hour as f64
                    + 0.8 * day as f64;
                RawRecord::new(area, occupancy, day, hour).with_consumption(consumption)
            })
            .collect()
    }

    #[test]
    fn untrained_service_refuses_predictions() {
        let dir = TempDir::new().unwrap();
        let service = PredictionService::open(dir.path()).unwrap();

        assert!(!service.is_trained());
        let err = service
            .predict_one(&RawRecord::new(300.0, 15, 2, 10))
            .unwrap_err();
        assert!(matches!(err, PredictionError::ScalerNotFound));
    }

    #[test]
    fn train_then_predict() {
        let dir = TempDir::new().unwrap();
        let service = PredictionService::open(dir.path()).unwrap();

        let metrics = service.train(&training_records()).unwrap();
        assert!(service.is_trained());
        assert!(metrics.r2 > 0.9);

        let prediction = service
            .predict_one(&RawRecord::new(300.0, 15, 2, 10))
            .unwrap();
        assert!(prediction.is_finite());
    }

    #[test]
    fn training_without_targets_reports_missing_column() {
        let dir = TempDir::new().unwrap();
        let service = PredictionService::open(dir.path()).unwrap();

        let records: Vec<RawRecord> = (0..5u32)
            .map(|i| RawRecord::new(100.0 + i as f64, 5, 1, 9))
            .collect();
        let err = service.train(&records).unwrap_err();
        assert!(matches!(err, PredictionError::MissingColumn(_)));
    }

    #[test]
    fn failed_train_leaves_predictions_unchanged() {
        let dir = TempDir::new().unwrap();
        let service = PredictionService::open(dir.path()).unwrap();
        service.train(&training_records()).unwrap();

        let probe = RawRecord::new(300.0, 15, 2, 10);
        let before = service.predict_one(&probe).unwrap();

        // targetless batch with a wildly different area scale: must fail
        // without refitting the persisted scaler
        let targetless: Vec<RawRecord> = (0..10u32)
            .map(|i| RawRecord::new(100_000.0 + i as f64, 2, 1, 4))
            .collect();
        assert!(matches!(
            service.train(&targetless),
            Err(PredictionError::MissingColumn(_))
        ));

        // too few rows for the holdout split
        let tiny = vec![RawRecord::new(50.0, 1, 0, 0).with_consumption(30.0)];
        assert!(matches!(
            service.train(&tiny),
            Err(PredictionError::InsufficientData { .. })
        ));

        let after = service.predict_one(&probe).unwrap();
        assert_eq!(before, after);

        // the persisted blobs are untouched too
        let reloaded = PredictionService::open(dir.path()).unwrap();
        assert_eq!(reloaded.predict_one(&probe).unwrap(), before);
    }

    #[test]
    fn feature_importance_is_named_per_column() {
        let dir = TempDir::new().unwrap();
        let service = PredictionService::open(dir.path()).unwrap();
        service.train(&training_records()).unwrap();

        let importance = service.feature_importance().unwrap();
        assert_eq!(importance.len(), FEATURE_COLUMNS.len());
        assert_eq!(importance[0].0, "area");
    }
}

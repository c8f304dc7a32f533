//! Building energy consumption prediction core
//!
//! The portal's prediction pipeline: a deterministic feature transformer
//! (cyclical day/hour encodings, business-day/hour indicators, occupancy
//! ratio, persisted standardization) feeding a linear regression model with
//! a train/evaluate/persist/reload lifecycle. The surrounding web layer
//! calls [`service::PredictionService`]; it owns everything else (auth,
//! rendering, storage of individual predictions).

pub mod config;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod service;
pub mod storage;
pub mod telemetry;

pub use domain::RawRecord;
pub use error::{PredictionError, Result};
pub use model::{EnergyModel, TrainingMetrics, TrainingOptions};
pub use pipeline::{FeatureMatrix, FeaturePipeline, FEATURE_COLUMNS};
pub use service::PredictionService;

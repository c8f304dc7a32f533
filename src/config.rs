use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::path::PathBuf;

use crate::dataset::SyntheticOptions;
use crate::model::TrainingOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub training: TrainingOptions,
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted scaler and model blobs
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Optional JSON dataset to train from; when absent, synthetic data is
    /// generated instead
    pub path: Option<PathBuf>,
    pub synthetic: SyntheticOptions,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("ENERGY__").split("__"));
        Ok(figment.extract()?)
    }
}

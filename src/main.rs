use anyhow::{Context, Result};
use building_energy::{config, dataset, service, telemetry};
use config::Config;
use service::PredictionService;
use telemetry::init_tracing;
use tracing::{info, warn};

/// Admin trainer: (re)fits the consumption model from a configured dataset,
/// or from seeded synthetic data when none is configured, and persists the
/// scaler and model blobs for the portal to pick up.
fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;

    let records = match &cfg.dataset.path {
        Some(path) => {
            info!(path = %path.display(), "loading training dataset");
            dataset::io::read_records(path)
                .with_context(|| format!("failed to load dataset from {}", path.display()))?
        }
        None => {
            warn!(
                samples = cfg.dataset.synthetic.samples,
                seed = cfg.dataset.synthetic.seed,
                "no dataset configured; generating synthetic training data"
            );
            dataset::generate(&cfg.dataset.synthetic)
        }
    };

    let service =
        PredictionService::open_with_options(&cfg.storage.dir, cfg.training.clone())?;
    let metrics = service
        .train(&records)
        .context("training pass failed")?;

    info!(
        rows = records.len(),
        mse = metrics.mse,
        rmse = metrics.rmse,
        r2 = metrics.r2,
        storage = %cfg.storage.dir.display(),
        "model trained and persisted"
    );
    Ok(())
}

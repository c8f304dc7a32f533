//! End-to-end tests for the prediction service: train, persist, reload in a
//! fresh instance, predict.

use building_energy::{
    dataset, PredictionError, PredictionService, RawRecord, FEATURE_COLUMNS,
};
use tempfile::TempDir;

/// Twenty near-identical observations of one building around 42 kWh. The
/// tiny area jitter is mirrored into consumption so the relationship stays
/// exactly learnable.
fn near_constant_batch() -> Vec<RawRecord> {
    (0..20u32)
        .map(|i| {
            let jitter = (i as f64 - 10.0) / 10.0; // -1.0 .. 0.9
            RawRecord::new(1000.0 + jitter, 50, 2, 14)
                .with_consumption(42.0 + 0.1 * jitter)
        })
        .collect()
}

#[test]
fn near_constant_building_predicts_close_to_observed() {
    let dir = TempDir::new().unwrap();
    let service = PredictionService::open(dir.path()).unwrap();

    let metrics = service.train(&near_constant_batch()).unwrap();
    assert!(metrics.r2 >= 0.0 && metrics.r2 <= 1.0, "r2 = {}", metrics.r2);
    assert!(metrics.rmse < 1.0);

    let prediction = service
        .predict_one(&RawRecord::new(1000.0, 50, 2, 14))
        .unwrap();
    assert!(
        (prediction - 42.0).abs() < 2.0,
        "prediction {prediction} not within ±2.0 of 42.0"
    );
}

#[test]
fn fresh_instance_predicts_identically_after_reload() {
    let dir = TempDir::new().unwrap();

    let batch = dataset::generate(&dataset::SyntheticOptions {
        samples: 200,
        noise_std: 5.0,
        seed: 7,
    });
    let probes: Vec<RawRecord> = vec![
        RawRecord::new(120.0, 8, 0, 3),
        RawRecord::new(350.0, 60, 4, 12),
        RawRecord::new(480.0, 95, 6, 23),
    ];

    let original = {
        let service = PredictionService::open(dir.path()).unwrap();
        service.train(&batch).unwrap();
        service.predict(&probes).unwrap()
    };

    // fresh process: everything comes back from the persisted blobs
    let service = PredictionService::open(dir.path()).unwrap();
    assert!(service.is_trained());
    let restored = service.predict(&probes).unwrap();

    for (a, b) in original.iter().zip(&restored) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }
}

#[test]
fn synthetic_recipe_is_recovered() {
    let dir = TempDir::new().unwrap();
    let service = PredictionService::open(dir.path()).unwrap();

    let batch = dataset::generate(&dataset::SyntheticOptions {
        samples: 500,
        noise_std: 1.0,
        seed: 3,
    });
    let metrics = service.train(&batch).unwrap();
    assert!(metrics.r2 > 0.95, "r2 = {}", metrics.r2);
    assert_eq!(metrics.coefficients.len(), FEATURE_COLUMNS.len());

    // a mid-range building should land near its recipe value
    let record = RawRecord::new(300.0, 50, 3, 12);
    let expected = 0.5 * 300.0 + 2.0 * 50.0 + 1.5 * 12.0 + 0.8 * 3.0;
    let prediction = service.predict_one(&record).unwrap();
    assert!(
        (prediction - expected).abs() < 10.0,
        "prediction {prediction}, expected ≈{expected}"
    );
}

#[test]
fn predictions_before_training_are_rejected() {
    let dir = TempDir::new().unwrap();
    let service = PredictionService::open(dir.path()).unwrap();

    let err = service
        .predict_one(&RawRecord::new(1000.0, 50, 2, 14))
        .unwrap_err();
    assert!(matches!(err, PredictionError::ScalerNotFound));
}

#[test]
fn retraining_overwrites_persisted_state() {
    let dir = TempDir::new().unwrap();
    let probe = RawRecord::new(300.0, 40, 1, 10);

    let first = {
        let service = PredictionService::open(dir.path()).unwrap();
        service
            .train(&dataset::generate(&dataset::SyntheticOptions {
                samples: 100,
                noise_std: 1.0,
                seed: 1,
            }))
            .unwrap();
        service.predict_one(&probe).unwrap()
    };

    // retrain on a scaled-up target; the persisted state must follow
    let service = PredictionService::open(dir.path()).unwrap();
    let mut doubled = dataset::generate(&dataset::SyntheticOptions {
        samples: 100,
        noise_std: 1.0,
        seed: 1,
    });
    for record in &mut doubled {
        record.consumption = record.consumption.map(|c| c * 2.0);
    }
    service.train(&doubled).unwrap();

    let reloaded = PredictionService::open(dir.path()).unwrap();
    let second = reloaded.predict_one(&probe).unwrap();
    assert!(
        (second - 2.0 * first).abs() < 5.0,
        "first {first}, second {second}"
    );
}

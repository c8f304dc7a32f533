//! Synthetic training data
//!
//! Seeded generator reproducing the portal's bootstrap dataset: uniform
//! building/occupancy/time draws with a known linear consumption recipe
//! plus Gaussian noise. Useful for seeding a fresh deployment and for
//! integration tests that need a learnable signal.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::domain::RawRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticOptions {
    pub samples: usize,
    pub noise_std: f64,
    pub seed: u64,
}

impl Default for SyntheticOptions {
    fn default() -> Self {
        Self {
            samples: 100,
            noise_std: 10.0,
            seed: 0,
        }
    }
}

/// Generate records with
/// `consumption = 0.5·area + 2·occupancy + 1.5·hour + 0.8·day + N(0, noise_std)`,
/// clamped to non-negative.
pub fn generate(options: &SyntheticOptions) -> Vec<RawRecord> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let noise = Normal::new(0.0, options.noise_std.max(f64::MIN_POSITIVE))
        .expect("valid normal distribution");

    (0..options.samples)
        .map(|_| {
            let area = rng.gen_range(50..500) as f64;
            let occupancy = rng.gen_range(1..100u32);
            let day = rng.gen_range(0..7u8);
            let hour = rng.gen_range(0..24u8);

            let consumption = 0.5 * area
                + 2.0 * occupancy as f64
                + 1.5 * hour as f64
                + 0.8 * day as f64
                + noise.sample(&mut rng);

            RawRecord::new(area, occupancy, day, hour).with_consumption(consumption.max(0.0))
        })
        .collect()
}

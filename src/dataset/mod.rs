//! Dataset tooling: JSON import/export and synthetic data generation

pub mod io;
pub mod synthetic;

pub use synthetic::{generate, SyntheticOptions};

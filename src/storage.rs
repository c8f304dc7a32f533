//! Durable storage for fitted state
//!
//! The scaler parameters and the model coefficients are each one JSON blob
//! on disk, overwritten on every successful training pass. Writes go to a
//! sibling temp file first and are renamed into place, so a concurrent
//! reader never observes a partially written blob.

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::Result;

/// Serialize `value` to `path` atomically, creating parent directories as
/// needed.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Deserialize a blob from `path`. Returns `Ok(None)` when no blob exists;
/// any other I/O or decode failure propagates.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

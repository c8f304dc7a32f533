//! JSON import/export of record batches
//!
//! The interchange format is a JSON array of field maps, the shape the web
//! layer produces from form submissions and uploads. Import routes through
//! [`RawRecord::from_map`] so absent fields surface as `MissingColumn`
//! rather than a bare decode error.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::domain::RawRecord;
use crate::error::{PredictionError, Result};

/// Read a record batch from a JSON file.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let bytes = fs::read(path)?;
    parse_records(&bytes)
}

/// Parse a record batch from JSON bytes.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let rows: Vec<HashMap<String, f64>> = serde_json::from_slice(bytes)?;
    if rows.is_empty() {
        return Err(PredictionError::InvalidInput("dataset is empty".into()));
    }
    rows.iter().map(RawRecord::from_map).collect()
}

/// Write a record batch as pretty-printed JSON, for export/download paths.
pub fn write_records(path: &Path, records: &[RawRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(records)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_valid_dataset() {
        let json = br#"[
            {"area": 1000.0, "occupancy": 50, "day_of_week": 2, "hour_of_day": 14, "consumption": 42.0},
            {"area": 800.0, "occupancy": 30, "day_of_week": 5, "hour_of_day": 20, "consumption": 31.5}
        ]"#;

        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].consumption, Some(42.0));
        assert_eq!(records[1].day_of_week, 5);
    }

    #[test]
    fn missing_field_is_missing_column() {
        let json = br#"[{"area": 1000.0, "occupancy": 50, "hour_of_day": 14}]"#;
        let err = parse_records(json).unwrap_err();
        match err {
            PredictionError::MissingColumn(columns) => assert_eq!(columns, vec!["day_of_week"]),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(parse_records(b"[]").is_err());
    }

    #[test]
    fn file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.json");

        let records = vec![
            RawRecord::new(1000.0, 50, 2, 14).with_consumption(42.0),
            RawRecord::new(800.0, 30, 5, 20),
        ];
        write_records(&path, &records).unwrap();

        let reloaded = read_records(&path).unwrap();
        assert_eq!(reloaded, records);
    }
}

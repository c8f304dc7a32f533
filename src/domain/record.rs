//! Raw observation records
//!
//! One record per building observation: floor area, occupant count and the
//! time-of-week position. The core uses a 0-based convention throughout:
//! `day_of_week` is 0=Monday..6=Sunday, `hour_of_day` is 0..23. Callers that
//! receive 1-based values (some upstream forms do) must normalize before
//! handing records to the pipeline.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{PredictionError, Result};

/// Required input fields, in the order they are reported when missing.
pub const REQUIRED_FIELDS: [&str; 4] = ["area", "occupancy", "day_of_week", "hour_of_day"];

/// Field name of the optional training target.
pub const TARGET_FIELD: &str = "consumption";

/// A single building observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Building floor area (m²), must be positive
    pub area: f64,
    /// Occupant count
    pub occupancy: u32,
    /// 0=Monday .. 6=Sunday
    pub day_of_week: u8,
    /// 0..23
    pub hour_of_day: u8,
    /// Measured consumption (kWh); present on training records only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption: Option<f64>,
}

impl RawRecord {
    pub fn new(area: f64, occupancy: u32, day_of_week: u8, hour_of_day: u8) -> Self {
        Self {
            area,
            occupancy,
            day_of_week,
            hour_of_day,
            consumption: None,
        }
    }

    pub fn with_consumption(mut self, consumption: f64) -> Self {
        self.consumption = Some(consumption);
        self
    }

    /// Build a record from a timestamp, deriving day-of-week (Monday=0) and
    /// hour-of-day the same way the portal's form handlers do.
    pub fn at<Tz: TimeZone>(area: f64, occupancy: u32, timestamp: &DateTime<Tz>) -> Self {
        Self::new(
            area,
            occupancy,
            timestamp.weekday().num_days_from_monday() as u8,
            timestamp.hour() as u8,
        )
    }

    /// Build a record from an untyped field map, as received from form
    /// submissions or JSON uploads. Every absent required field is reported
    /// in a single `MissingColumn` error.
    pub fn from_map(fields: &HashMap<String, f64>) -> Result<Self> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|name| !fields.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PredictionError::MissingColumn(missing));
        }

        let int_field = |name: &str| -> Result<u32> {
            let value = fields[name];
            if value < 0.0 || value.fract() != 0.0 {
                return Err(PredictionError::InvalidInput(format!(
                    "{name} must be a non-negative integer, got {value}"
                )));
            }
            if value > u32::MAX as f64 {
                return Err(PredictionError::InvalidInput(format!(
                    "{name} out of range: {value}"
                )));
            }
            Ok(value as u32)
        };

        let small_field = |name: &str| -> Result<u8> {
            let value = int_field(name)?;
            u8::try_from(value).map_err(|_| {
                PredictionError::InvalidInput(format!("{name} out of range: {value}"))
            })
        };

        let mut record = Self::new(
            fields["area"],
            int_field("occupancy")?,
            small_field("day_of_week")?,
            small_field("hour_of_day")?,
        );
        record.consumption = fields.get(TARGET_FIELD).copied();
        Ok(record)
    }

    /// Check numeric domains. Zero area would turn the occupancy ratio into
    /// a division by zero, so it is rejected up front.
    pub fn validate(&self) -> Result<()> {
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err(PredictionError::InvalidInput(format!(
                "area must be positive, got {}",
                self.area
            )));
        }
        if self.day_of_week > 6 {
            return Err(PredictionError::InvalidInput(format!(
                "day_of_week must be in 0..=6 (Monday=0), got {}",
                self.day_of_week
            )));
        }
        if self.hour_of_day > 23 {
            return Err(PredictionError::InvalidInput(format!(
                "hour_of_day must be in 0..=23, got {}",
                self.hour_of_day
            )));
        }
        if let Some(consumption) = self.consumption {
            if !consumption.is_finite() || consumption < 0.0 {
                return Err(PredictionError::InvalidInput(format!(
                    "consumption must be non-negative, got {consumption}"
                )));
            }
        }
        Ok(())
    }
}

//! Feature engineering for the consumption model
//!
//! Turns a raw observation into the numeric feature row the model consumes:
//! cyclical day/hour encodings, business-day/hour indicators and the
//! occupancy-per-area ratio. Column order is fixed and must match the order
//! the scaler was fitted with.

use std::f64::consts::PI;

use crate::domain::RawRecord;

/// Feature columns in the exact order they are emitted.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "area",
    "occupancy",
    "day_sin",
    "day_cos",
    "hour_sin",
    "hour_cos",
    "is_business_day",
    "is_business_hour",
    "occupancy_ratio",
];

/// Inclusive business-hour window.
pub const BUSINESS_HOURS: (u8, u8) = (8, 18);

/// Position on a unit circle of the given period. Values equal modulo the
/// period encode to the same point.
pub fn cyclical(value: f64, period: f64) -> (f64, f64) {
    let angle = 2.0 * PI * value / period;
    (angle.sin(), angle.cos())
}

/// Monday..Friday in the 0-based Monday=0 convention.
pub fn is_business_day(day_of_week: u8) -> bool {
    day_of_week < 5
}

/// Hour within the inclusive 8..=18 window.
pub fn is_business_hour(hour_of_day: u8) -> bool {
    (BUSINESS_HOURS.0..=BUSINESS_HOURS.1).contains(&hour_of_day)
}

/// Derive the feature row for one validated record, in [`FEATURE_COLUMNS`]
/// order. The original day/hour integers are dropped in favor of their
/// cyclical encodings.
pub fn feature_row(record: &RawRecord) -> Vec<f64> {
    let (day_sin, day_cos) = cyclical(record.day_of_week as f64, 7.0);
    let (hour_sin, hour_cos) = cyclical(record.hour_of_day as f64, 24.0);

    vec![
        record.area,
        record.occupancy as f64,
        day_sin,
        day_cos,
        hour_sin,
        hour_cos,
        if is_business_day(record.day_of_week) { 1.0 } else { 0.0 },
        if is_business_hour(record.hour_of_day) { 1.0 } else { 0.0 },
        record.occupancy as f64 / record.area,
    ]
}

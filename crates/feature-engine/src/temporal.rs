//! Temporal Feature Derivation
//!
//! Turns the scheduled and actual departure timestamps of a historical
//! flight into the engineered features used at training time.

use crate::error::DerivationError;
use crate::record::RawFlightRecord;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp format used throughout the flight dataset
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A departure later than this many minutes counts as delayed
pub const DELAY_THRESHOLD_MINUTES: f64 = 10.0;

/// High season ranges as closed `(month, day)` intervals within one year
const HIGH_SEASON_RANGES: [((u32, u32), (u32, u32)); 4] = [
    ((12, 15), (12, 31)),
    ((1, 1), (3, 3)),
    ((7, 15), (7, 31)),
    ((9, 11), (9, 30)),
];

/// Time-of-day bucket of a scheduled departure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodOfDay {
    /// 05:00 - 11:59
    Morning,
    /// 12:00 - 18:59
    Afternoon,
    /// 19:00 - 23:59
    Evening,
    /// 00:00 - 04:59
    Night,
}

impl PeriodOfDay {
    /// All buckets, in clock order starting at 05:00
    pub const ALL: [PeriodOfDay; 4] = [
        PeriodOfDay::Morning,
        PeriodOfDay::Afternoon,
        PeriodOfDay::Evening,
        PeriodOfDay::Night,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodOfDay::Morning => "morning",
            PeriodOfDay::Afternoon => "afternoon",
            PeriodOfDay::Evening => "evening",
            PeriodOfDay::Night => "night",
        }
    }

    /// Inclusive hour range covered by this bucket
    pub fn hours(&self) -> (u32, u32) {
        match self {
            PeriodOfDay::Morning => (5, 11),
            PeriodOfDay::Afternoon => (12, 18),
            PeriodOfDay::Evening => (19, 23),
            PeriodOfDay::Night => (0, 4),
        }
    }

    /// Whether a time of day falls inside this bucket
    pub fn contains<T: Timelike>(&self, time: &T) -> bool {
        let (start, end) = self.hours();
        (start..=end).contains(&time.hour())
    }
}

impl fmt::Display for PeriodOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engineered features of one historical flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    pub period_day: PeriodOfDay,
    /// 1 when the scheduled date is in high season
    pub high_season: u8,
    /// Actual minus scheduled departure, in minutes
    pub min_diff: f64,
    /// 1 when `min_diff` exceeds the delay threshold
    pub delay: u8,
}

/// Parse a dataset timestamp
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, DerivationError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| {
        DerivationError::Timestamp {
            value: value.to_string(),
            source,
        }
    })
}

/// Map a time of day onto its bucket
///
/// Buckets are whole hours, so every second of a minute lands in the same
/// bucket as the minute itself.
pub fn period_day<T: Timelike>(time: &T) -> PeriodOfDay {
    match time.hour() {
        5..=11 => PeriodOfDay::Morning,
        12..=18 => PeriodOfDay::Afternoon,
        19..=23 => PeriodOfDay::Evening,
        _ => PeriodOfDay::Night,
    }
}

/// 1 if the date falls inside any high season range of its own year
pub fn is_high_season<D: Datelike>(date: &D) -> u8 {
    let day = (date.month(), date.day());
    let in_season = HIGH_SEASON_RANGES
        .iter()
        .any(|(start, end)| *start <= day && day <= *end);
    u8::from(in_season)
}

/// Signed minutes between scheduled and actual departure
pub fn minutes_late(scheduled: &NaiveDateTime, actual: &NaiveDateTime) -> f64 {
    (*actual - *scheduled).num_seconds() as f64 / 60.0
}

/// Delay label for a minute difference (strictly greater than the threshold)
pub fn delay_label(min_diff: f64) -> u8 {
    u8::from(min_diff > DELAY_THRESHOLD_MINUTES)
}

/// Derive all engineered features of a training record
pub fn derive(record: &RawFlightRecord) -> Result<EngineeredFeatures, DerivationError> {
    let scheduled = parse_timestamp(&record.scheduled)?;
    let actual = parse_timestamp(&record.actual)?;
    let min_diff = minutes_late(&scheduled, &actual);

    Ok(EngineeredFeatures {
        period_day: period_day(&scheduled),
        high_season: is_high_season(&scheduled),
        min_diff,
        delay: delay_label(min_diff),
    })
}

//! Flight Record Types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flight type code as it appears in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightType {
    /// Domestic flight ("N")
    #[serde(rename = "N")]
    Domestic,
    /// International flight ("I")
    #[serde(rename = "I")]
    International,
}

impl FlightType {
    /// Dataset code for this flight type
    pub fn code(&self) -> &'static str {
        match self {
            FlightType::Domestic => "N",
            FlightType::International => "I",
        }
    }

    /// Parse a dataset code, `None` for anything unrecognised
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "N" => Some(FlightType::Domestic),
            "I" => Some(FlightType::International),
            _ => None,
        }
    }
}

impl fmt::Display for FlightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Historical flight record used for training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFlightRecord {
    /// Scheduled departure, `%Y-%m-%d %H:%M:%S`
    pub scheduled: String,
    /// Actual departure, `%Y-%m-%d %H:%M:%S`
    pub actual: String,
    /// Operating airline name
    pub airline: String,
    /// Flight type code
    pub flight_type: String,
    /// Month number (1-12)
    pub month: u32,
}

/// Flight descriptor received at serving time
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlightQuery {
    pub airline: String,
    pub flight_type: Option<String>,
    pub month: Option<i64>,
}

impl FlightQuery {
    /// Create a query with every optional field set
    pub fn new(airline: impl Into<String>, flight_type: impl Into<String>, month: i64) -> Self {
        Self {
            airline: airline.into(),
            flight_type: Some(flight_type.into()),
            month: Some(month),
        }
    }
}

impl From<&RawFlightRecord> for FlightQuery {
    fn from(record: &RawFlightRecord) -> Self {
        Self {
            airline: record.airline.clone(),
            flight_type: Some(record.flight_type.clone()),
            month: Some(i64::from(record.month)),
        }
    }
}

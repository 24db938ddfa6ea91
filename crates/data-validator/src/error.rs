//! Validation Error Types

use thiserror::Error;

/// Errors during flight query validation
///
/// Every variant carries the position of the offending query in its batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Airline never observed in the training data
    #[error("Flight {index}: airline '{airline}' is not one of the airlines used by the model")]
    UnknownAirline { index: usize, airline: String },

    /// Flight type code other than "N" or "I"
    #[error("Flight {index}: flight type '{value}' must be 'N' or 'I'")]
    InvalidFlightType { index: usize, value: String },

    /// Month outside 1-12
    #[error("Flight {index}: month {value} is out of range [1, 12]")]
    MonthOutOfRange { index: usize, value: i64 },
}

impl ValidationError {
    /// Batch position of the rejected query
    pub fn index(&self) -> usize {
        match self {
            ValidationError::UnknownAirline { index, .. }
            | ValidationError::InvalidFlightType { index, .. }
            | ValidationError::MonthOutOfRange { index, .. } => *index,
        }
    }

    /// Name of the rejected field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::UnknownAirline { .. } => "airline",
            ValidationError::InvalidFlightType { .. } => "flight_type",
            ValidationError::MonthOutOfRange { .. } => "month",
        }
    }
}

//! Vocabulary Validator

use crate::error::ValidationError;
use crate::vocabulary::AirlineVocabulary;
use feature_engine::{FlightQuery, FlightType};
use std::ops::RangeInclusive;
use tracing::debug;

/// Valid month numbers
pub const MONTH_RANGE: RangeInclusive<i64> = 1..=12;

/// Validates flight queries against what the model saw during training
#[derive(Debug, Clone)]
pub struct VocabularyValidator {
    vocabulary: AirlineVocabulary,
}

impl VocabularyValidator {
    /// Create a validator over a training vocabulary
    pub fn new(vocabulary: AirlineVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &AirlineVocabulary {
        &self.vocabulary
    }

    /// Validate the airline of a query
    pub fn validate_airline(&self, airline: &str, index: usize) -> Result<(), ValidationError> {
        if self.vocabulary.contains(airline) {
            Ok(())
        } else {
            Err(ValidationError::UnknownAirline {
                index,
                airline: airline.to_string(),
            })
        }
    }

    /// Validate an optional flight type code
    pub fn validate_flight_type(
        &self,
        flight_type: Option<&str>,
        index: usize,
    ) -> Result<(), ValidationError> {
        match flight_type {
            Some(code) if FlightType::from_code(code).is_none() => {
                Err(ValidationError::InvalidFlightType {
                    index,
                    value: code.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Validate an optional month number
    pub fn validate_month(&self, month: Option<i64>, index: usize) -> Result<(), ValidationError> {
        match month {
            Some(value) if !MONTH_RANGE.contains(&value) => {
                Err(ValidationError::MonthOutOfRange { index, value })
            }
            _ => Ok(()),
        }
    }

    /// Validate one query at its batch position
    pub fn validate(&self, query: &FlightQuery, index: usize) -> Result<(), ValidationError> {
        self.validate_airline(&query.airline, index)?;
        self.validate_flight_type(query.flight_type.as_deref(), index)?;
        self.validate_month(query.month, index)
    }

    /// Validate a whole batch, stopping at the first rejected query
    pub fn validate_batch(&self, queries: &[FlightQuery]) -> Result<(), ValidationError> {
        for (index, query) in queries.iter().enumerate() {
            self.validate(query, index)?;
        }
        debug!("Validated batch of {} flights", queries.len());
        Ok(())
    }
}

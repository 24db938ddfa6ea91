//! Airline Vocabulary

use feature_engine::RawFlightRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Distinct airline names observed in the training dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineVocabulary {
    airlines: BTreeSet<String>,
}

impl AirlineVocabulary {
    /// Collect the airlines of a training dataset
    pub fn from_records(records: &[RawFlightRecord]) -> Self {
        records.iter().map(|r| r.airline.as_str()).collect()
    }

    pub fn contains(&self, airline: &str) -> bool {
        self.airlines.contains(airline)
    }

    pub fn len(&self) -> usize {
        self.airlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airlines.is_empty()
    }

    /// Airline names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.airlines.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AirlineVocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            airlines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(airline: &str) -> RawFlightRecord {
        RawFlightRecord {
            scheduled: "2017-01-01 10:00:00".to_string(),
            actual: "2017-01-01 10:00:00".to_string(),
            airline: airline.to_string(),
            flight_type: "N".to_string(),
            month: 1,
        }
    }

    #[test]
    fn test_vocabulary_is_distinct() {
        let records = vec![record("Grupo LATAM"), record("Sky Airline"), record("Grupo LATAM")];
        let vocabulary = AirlineVocabulary::from_records(&records);

        assert_eq!(vocabulary.len(), 2);
        assert!(vocabulary.contains("Grupo LATAM"));
        assert!(!vocabulary.contains("grupo latam"));
        assert_eq!(vocabulary.iter().collect::<Vec<_>>(), ["Grupo LATAM", "Sky Airline"]);
    }

    #[test]
    fn test_empty_vocabulary() {
        let vocabulary = AirlineVocabulary::from_records(&[]);
        assert!(vocabulary.is_empty());
        assert!(!vocabulary.contains(""));
    }
}

//! One-Hot Feature Space Projection
//!
//! Training and serving both go through [`FeatureSpaceProjector`], which owns
//! the single [`FeatureWhitelist`] the classifier is fitted against. Learn
//! mode expands a dataset into candidate one-hot columns and keeps only the
//! whitelisted ones; apply mode projects one serving query onto the same
//! columns.

use crate::record::{FlightQuery, RawFlightRecord};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Column prefix for airline indicators
pub const AIRLINE_PREFIX: &str = "airline";
/// Column prefix for flight type indicators
pub const FLIGHT_TYPE_PREFIX: &str = "flighttype";
/// Column prefix for month indicators
pub const MONTH_PREFIX: &str = "month";

/// The ten most predictive one-hot columns, in model order
const TOP_TEN_COLUMNS: [&str; 10] = [
    "airline_Latin American Wings",
    "month_7",
    "month_10",
    "airline_Grupo LATAM",
    "month_12",
    "flighttype_I",
    "month_4",
    "month_11",
    "airline_Sky Airline",
    "airline_Copa Air",
];

fn column_name(prefix: &str, value: impl fmt::Display) -> String {
    format!("{}_{}", prefix, value)
}

#[derive(Debug)]
struct WhitelistInner {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

/// Ordered, immutable set of one-hot columns shared by training and serving
///
/// Cloning is cheap and every clone refers to the same column list.
#[derive(Debug, Clone)]
pub struct FeatureWhitelist {
    inner: Arc<WhitelistInner>,
}

impl FeatureWhitelist {
    /// Build a whitelist from column names; repeated names keep their first position
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut index = HashMap::new();
        for column in columns {
            let column = column.into();
            if index.contains_key(&column) {
                warn!("Ignoring repeated whitelist column '{}'", column);
                continue;
            }
            index.insert(column.clone(), ordered.len());
            ordered.push(column);
        }

        Self {
            inner: Arc::new(WhitelistInner {
                columns: ordered,
                index,
            }),
        }
    }

    /// The fixed ten-column whitelist the delay model is trained on
    pub fn top_ten() -> Self {
        Self::new(TOP_TEN_COLUMNS)
    }

    /// Column names in model order
    pub fn columns(&self) -> &[String] {
        &self.inner.columns
    }

    /// Position of a column, if whitelisted
    pub fn position(&self, column: &str) -> Option<usize> {
        self.inner.index.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.inner.index.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.inner.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.columns.is_empty()
    }

    /// Whether both handles refer to the same underlying whitelist
    pub fn same_instance(&self, other: &FeatureWhitelist) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for FeatureWhitelist {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other) || self.inner.columns == other.inner.columns
    }
}

impl Eq for FeatureWhitelist {}

/// Binary feature vector aligned to a whitelist
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    whitelist: FeatureWhitelist,
    values: Vec<f64>,
}

impl FeatureVector {
    /// All-zero vector over the whitelist's columns
    pub fn zeros(whitelist: &FeatureWhitelist) -> Self {
        Self {
            whitelist: whitelist.clone(),
            values: vec![0.0; whitelist.len()],
        }
    }

    /// Set a column to 1; columns outside the whitelist are ignored
    fn activate(&mut self, column: &str) {
        if let Some(idx) = self.whitelist.position(column) {
            self.values[idx] = 1.0;
        }
    }

    /// Raw values in whitelist order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Column names in whitelist order
    pub fn columns(&self) -> &[String] {
        self.whitelist.columns()
    }

    pub fn whitelist(&self) -> &FeatureWhitelist {
        &self.whitelist
    }

    /// Value of a named column
    pub fn get(&self, column: &str) -> Option<f64> {
        self.whitelist.position(column).map(|idx| self.values[idx])
    }

    /// `(column, value)` pairs in whitelist order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of active (1) columns
    pub fn active_count(&self) -> usize {
        self.values.iter().filter(|&&v| v != 0.0).count()
    }
}

/// Result of learning the feature space over a training dataset
#[derive(Debug, Clone)]
pub struct LearnedFeatureSpace {
    /// One whitelist-aligned vector per input record, same order
    pub rows: Vec<FeatureVector>,
    /// Every one-hot column observed in the dataset
    pub candidate_columns: BTreeSet<String>,
    /// Observed columns dropped because they are not whitelisted
    pub discarded_columns: Vec<String>,
    /// Whitelisted columns never observed, kept as all-zero columns
    pub empty_columns: Vec<String>,
}

/// Projects flight attributes onto the whitelisted one-hot feature space
#[derive(Debug, Clone)]
pub struct FeatureSpaceProjector {
    whitelist: FeatureWhitelist,
}

impl FeatureSpaceProjector {
    /// Create a projector bound to a whitelist
    pub fn new(whitelist: FeatureWhitelist) -> Self {
        debug!("Creating feature projector over {} columns", whitelist.len());
        Self { whitelist }
    }

    pub fn whitelist(&self) -> &FeatureWhitelist {
        &self.whitelist
    }

    /// One-hot column names a query would expand into, before restriction
    pub fn candidate_columns(query: &FlightQuery) -> Vec<String> {
        let mut columns = Vec::with_capacity(3);
        columns.push(column_name(AIRLINE_PREFIX, &query.airline));
        if let Some(flight_type) = &query.flight_type {
            columns.push(column_name(FLIGHT_TYPE_PREFIX, flight_type));
        }
        if let Some(month) = query.month {
            columns.push(column_name(MONTH_PREFIX, month));
        }
        columns
    }

    /// Expand a training dataset into whitelist-aligned vectors
    pub fn learn(&self, records: &[RawFlightRecord]) -> LearnedFeatureSpace {
        let mut candidate_columns = BTreeSet::new();
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            let query = FlightQuery::from(record);
            candidate_columns.extend(Self::candidate_columns(&query));
            rows.push(self.apply(&query));
        }

        let discarded_columns: Vec<String> = candidate_columns
            .iter()
            .filter(|column| !self.whitelist.contains(column))
            .cloned()
            .collect();

        let empty_columns: Vec<String> = self
            .whitelist
            .columns()
            .iter()
            .filter(|column| !candidate_columns.contains(*column))
            .cloned()
            .collect();

        info!(
            "Learned feature space: {} rows, {} candidate columns, {} discarded",
            rows.len(),
            candidate_columns.len(),
            discarded_columns.len()
        );
        if !empty_columns.is_empty() {
            warn!(
                "Whitelisted columns absent from training data: {:?}",
                empty_columns
            );
        }

        LearnedFeatureSpace {
            rows,
            candidate_columns,
            discarded_columns,
            empty_columns,
        }
    }

    /// Project one query onto the whitelist
    ///
    /// Values whose column is not whitelisted contribute nothing; an all-zero
    /// vector is a valid result.
    pub fn apply(&self, query: &FlightQuery) -> FeatureVector {
        let mut vector = FeatureVector::zeros(&self.whitelist);
        for column in Self::candidate_columns(query) {
            vector.activate(&column);
        }
        vector
    }
}

impl Default for FeatureSpaceProjector {
    fn default() -> Self {
        Self::new(FeatureWhitelist::top_ten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(airline: &str, flight_type: &str, month: u32) -> RawFlightRecord {
        RawFlightRecord {
            scheduled: "2017-01-01 10:00:00".to_string(),
            actual: "2017-01-01 10:05:00".to_string(),
            airline: airline.to_string(),
            flight_type: flight_type.to_string(),
            month,
        }
    }

    #[test]
    fn test_top_ten_whitelist() {
        let whitelist = FeatureWhitelist::top_ten();
        assert_eq!(whitelist.len(), 10);
        assert_eq!(whitelist.position("airline_Latin American Wings"), Some(0));
        assert_eq!(whitelist.position("flighttype_I"), Some(5));
        assert_eq!(whitelist.position("airline_Copa Air"), Some(9));
        assert!(!whitelist.contains("flighttype_N"));
    }

    #[test]
    fn test_repeated_columns_keep_first_position() {
        let whitelist = FeatureWhitelist::new(["month_7", "month_4", "month_7"]);
        assert_eq!(whitelist.columns(), ["month_7", "month_4"]);
    }

    #[test]
    fn test_apply_sets_whitelisted_columns() {
        let projector = FeatureSpaceProjector::default();
        let vector = projector.apply(&FlightQuery::new("Grupo LATAM", "I", 7));

        assert_eq!(vector.columns(), projector.whitelist().columns());
        assert_eq!(vector.get("airline_Grupo LATAM"), Some(1.0));
        assert_eq!(vector.get("flighttype_I"), Some(1.0));
        assert_eq!(vector.get("month_7"), Some(1.0));
        assert_eq!(vector.active_count(), 3);
    }

    #[test]
    fn test_apply_domestic_contributes_nothing() {
        let projector = FeatureSpaceProjector::default();
        let vector = projector.apply(&FlightQuery::new("Sky Airline", "N", 4));

        assert_eq!(vector.get("flighttype_I"), Some(0.0));
        assert_eq!(vector.active_count(), 2);
    }

    #[test]
    fn test_apply_all_zero_vector() {
        let projector = FeatureSpaceProjector::default();
        let vector = projector.apply(&FlightQuery::new("Aerolineas Argentinas", "N", 3));

        assert_eq!(vector.len(), 10);
        assert_eq!(vector.active_count(), 0);
    }

    #[test]
    fn test_apply_missing_optional_fields() {
        let projector = FeatureSpaceProjector::default();
        let query = FlightQuery {
            airline: "Copa Air".to_string(),
            flight_type: None,
            month: None,
        };
        let vector = projector.apply(&query);

        assert_eq!(vector.get("airline_Copa Air"), Some(1.0));
        assert_eq!(vector.active_count(), 1);
    }

    #[test]
    fn test_vectors_share_whitelist_instance() {
        let projector = FeatureSpaceProjector::default();
        let vector = projector.apply(&FlightQuery::new("Copa Air", "I", 1));
        assert!(vector.whitelist().same_instance(projector.whitelist()));
    }

    #[test]
    fn test_learn_restricts_to_whitelist() {
        let projector = FeatureSpaceProjector::default();
        let records = vec![
            record("Grupo LATAM", "I", 7),
            record("Sky Airline", "N", 3),
            record("American Airlines", "I", 12),
        ];

        let learned = projector.learn(&records);

        assert_eq!(learned.rows.len(), 3);
        assert!(learned.candidate_columns.contains("airline_American Airlines"));
        assert!(learned
            .discarded_columns
            .contains(&"airline_American Airlines".to_string()));
        assert!(learned.discarded_columns.contains(&"flighttype_N".to_string()));
        assert!(learned.discarded_columns.contains(&"month_3".to_string()));
        assert!(learned.empty_columns.contains(&"month_10".to_string()));
        assert!(learned
            .empty_columns
            .contains(&"airline_Latin American Wings".to_string()));

        let first = &learned.rows[0];
        assert_eq!(first.get("airline_Grupo LATAM"), Some(1.0));
        assert_eq!(first.get("month_7"), Some(1.0));
        assert_eq!(learned.rows[2].get("month_12"), Some(1.0));
        assert_eq!(learned.rows[2].active_count(), 2);
    }

    #[test]
    fn test_learn_matches_apply() {
        let projector = FeatureSpaceProjector::default();
        let records = vec![record("Copa Air", "I", 11), record("Grupo LATAM", "N", 10)];
        let learned = projector.learn(&records);

        for (record, row) in records.iter().zip(&learned.rows) {
            assert_eq!(row, &projector.apply(&FlightQuery::from(record)));
        }
    }

    fn arb_query() -> impl Strategy<Value = FlightQuery> {
        let airlines = prop::sample::select(vec![
            "Grupo LATAM",
            "Sky Airline",
            "Copa Air",
            "Latin American Wings",
            "JetSmart SPA",
            "Unknown Air",
        ]);
        (
            airlines,
            prop::option::of(prop::sample::select(vec!["I", "N", "X"])),
            prop::option::of(-3i64..15),
        )
            .prop_map(|(airline, flight_type, month)| FlightQuery {
                airline: airline.to_string(),
                flight_type: flight_type.map(str::to_string),
                month,
            })
    }

    proptest! {
        #[test]
        fn prop_apply_aligned_to_whitelist(query in arb_query()) {
            let projector = FeatureSpaceProjector::default();
            let vector = projector.apply(&query);
            prop_assert_eq!(vector.columns(), projector.whitelist().columns());
            prop_assert!(vector.values().iter().all(|&v| v == 0.0 || v == 1.0));
            prop_assert!(vector.active_count() <= 3);
        }

        #[test]
        fn prop_apply_is_idempotent(query in arb_query()) {
            let projector = FeatureSpaceProjector::default();
            prop_assert_eq!(projector.apply(&query), projector.apply(&query));
        }
    }
}

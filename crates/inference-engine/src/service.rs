//! Batch Prediction Service

use crate::training::TrainedModelState;
use crate::PipelineError;
use feature_engine::{FeatureVector, FlightQuery};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Validates, vectorises and classifies batches of flight queries
///
/// Holds a shared, read-only model; clones are cheap and can serve requests
/// from any number of threads.
#[derive(Debug, Clone)]
pub struct PredictionService {
    state: Arc<TrainedModelState>,
}

impl PredictionService {
    pub fn new(state: Arc<TrainedModelState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &TrainedModelState {
        &self.state
    }

    /// Predict one delay label per query, in input order
    ///
    /// The whole batch is validated before anything is vectorised; the first
    /// invalid query rejects the batch and no labels are returned.
    pub fn predict_batch(&self, queries: &[FlightQuery]) -> Result<Vec<u8>, PipelineError> {
        let start = Instant::now();

        self.state.validator().validate_batch(queries)?;

        let projector = self.state.projector();
        let features: Vec<FeatureVector> = queries.iter().map(|q| projector.apply(q)).collect();
        let labels = self.state.classifier().predict(&features)?;

        debug!(
            "Predicted {} flights in {}us",
            labels.len(),
            start.elapsed().as_micros()
        );
        Ok(labels)
    }

    /// Predict a single query
    pub fn predict_one(&self, query: &FlightQuery) -> Result<u8, PipelineError> {
        let labels = self.predict_batch(std::slice::from_ref(query))?;
        Ok(labels[0])
    }
}

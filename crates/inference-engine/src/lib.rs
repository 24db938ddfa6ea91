//! Delay Inference Engine
//!
//! Trains the class-weighted linear delay classifier and serves batched
//! predictions over an immutable trained model.

mod classifier;
mod service;
mod training;

pub use classifier::{ClassWeights, ClassifierConfig, DelayClassifier, FitReport, LinearParameters};
pub use service::PredictionService;
pub use training::{train, train_with_projector, TrainedModelState};

use data_validator::ValidationError;
use feature_engine::DerivationError;
use thiserror::Error;

/// Classifier misuse and integration defects
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("Classifier has not been fitted")]
    NotFitted,
    #[error("Row count mismatch: {features} feature rows, {labels} labels")]
    RowCountMismatch { features: usize, labels: usize },
    #[error("Invalid input shape: expected {expected} columns, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Training set is empty")]
    EmptyTrainingSet,
    #[error("Training partition contains only class {0}")]
    SingleClass(u8),
    #[error("Invalid label {label} at row {row}: expected 0 or 1")]
    InvalidLabel { row: usize, label: u8 },
    #[error("Invalid classifier configuration: {0}")]
    InvalidConfig(String),
}

/// Errors while training the model from a raw dataset
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Feature derivation failed at record {index}: {source}")]
    Derivation {
        index: usize,
        #[source]
        source: DerivationError,
    },
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Errors from the serving path
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Caller supplied a value the model cannot accept
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Model state is inconsistent with the request path
    #[error(transparent)]
    Configuration(#[from] ClassifierError),
}

//! Training Pipeline
//!
//! Builds the immutable [`TrainedModelState`] from a historical dataset:
//! temporal derivation for the delay label, vocabulary collection, feature
//! space learning and classifier fitting.

use crate::classifier::{ClassifierConfig, DelayClassifier, FitReport};
use crate::{ClassifierError, TrainingError};
use data_validator::{AirlineVocabulary, VocabularyValidator};
use feature_engine::{derive, FeatureSpaceProjector, FeatureWhitelist, RawFlightRecord};
use tracing::info;

/// Everything the serving path needs, frozen after training
#[derive(Debug, Clone)]
pub struct TrainedModelState {
    classifier: DelayClassifier,
    projector: FeatureSpaceProjector,
    validator: VocabularyValidator,
    fit_report: Option<FitReport>,
}

impl TrainedModelState {
    /// Assemble a state from a fitted classifier
    ///
    /// Fails when the classifier is unfitted or its input width differs from
    /// the projector's whitelist.
    pub fn new(
        classifier: DelayClassifier,
        projector: FeatureSpaceProjector,
        vocabulary: AirlineVocabulary,
    ) -> Result<Self, ClassifierError> {
        let width = classifier.input_width().ok_or(ClassifierError::NotFitted)?;
        if width != projector.whitelist().len() {
            return Err(ClassifierError::InvalidInputShape {
                expected: width,
                actual: projector.whitelist().len(),
            });
        }

        Ok(Self {
            classifier,
            projector,
            validator: VocabularyValidator::new(vocabulary),
            fit_report: None,
        })
    }

    pub fn classifier(&self) -> &DelayClassifier {
        &self.classifier
    }

    pub fn projector(&self) -> &FeatureSpaceProjector {
        &self.projector
    }

    pub fn validator(&self) -> &VocabularyValidator {
        &self.validator
    }

    pub fn whitelist(&self) -> &FeatureWhitelist {
        self.projector.whitelist()
    }

    pub fn vocabulary(&self) -> &AirlineVocabulary {
        self.validator.vocabulary()
    }

    /// Fit summary, absent for states assembled from known parameters
    pub fn fit_report(&self) -> Option<&FitReport> {
        self.fit_report.as_ref()
    }
}

/// Train over the fixed top-ten whitelist
pub fn train(
    dataset: &[RawFlightRecord],
    config: &ClassifierConfig,
) -> Result<TrainedModelState, TrainingError> {
    train_with_projector(
        dataset,
        FeatureSpaceProjector::new(FeatureWhitelist::top_ten()),
        config,
    )
}

/// Train with a given projector; the projector moves into the returned state
/// so serving reuses the exact whitelist instance used for fitting.
pub fn train_with_projector(
    dataset: &[RawFlightRecord],
    projector: FeatureSpaceProjector,
    config: &ClassifierConfig,
) -> Result<TrainedModelState, TrainingError> {
    info!("Training delay model on {} records", dataset.len());

    let engineered = dataset
        .iter()
        .enumerate()
        .map(|(index, record)| {
            derive(record).map_err(|source| TrainingError::Derivation { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let labels: Vec<u8> = engineered.iter().map(|f| f.delay).collect();
    let delayed = labels.iter().filter(|&&y| y == 1).count();
    let high_season = engineered.iter().filter(|f| f.high_season == 1).count();
    info!(
        "Derived features: {} delayed, {} in high season",
        delayed, high_season
    );

    let vocabulary = AirlineVocabulary::from_records(dataset);
    let learned = projector.learn(dataset);

    let mut classifier = DelayClassifier::new(config.clone());
    let report = classifier.fit(&learned.rows, &labels)?;

    info!(
        "Delay model ready: {} airlines, {} features",
        vocabulary.len(),
        projector.whitelist().len()
    );

    let mut state = TrainedModelState::new(classifier, projector, vocabulary)?;
    state.fit_report = Some(report);
    Ok(state)
}

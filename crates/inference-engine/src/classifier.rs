//! Class-Weighted Logistic Regression

use crate::ClassifierError;
use feature_engine::FeatureVector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Training hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Share of rows held out from fitting
    pub test_size: f64,
    /// Seed of the train/held-out shuffle
    pub seed: u64,
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Maximum gradient descent iterations
    pub max_iterations: usize,
    /// Stop once the largest gradient component falls below this
    pub tolerance: f64,
    /// Inverse L2 regularization strength
    pub regularization: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            test_size: 0.33,
            seed: 42,
            learning_rate: 0.5,
            max_iterations: 1000,
            tolerance: 1e-6,
            regularization: 1.0,
        }
    }
}

impl ClassifierConfig {
    fn check(&self) -> Result<(), ClassifierError> {
        if !(0.0..1.0).contains(&self.test_size) {
            return Err(ClassifierError::InvalidConfig(format!(
                "test_size {} must be in [0, 1)",
                self.test_size
            )));
        }
        for (name, value) in [
            ("learning_rate", self.learning_rate),
            ("regularization", self.regularization),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ClassifierError::InvalidConfig(format!(
                    "{} {} must be finite and positive",
                    name, value
                )));
            }
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ClassifierError::InvalidConfig(format!(
                "tolerance {} must be finite and non-negative",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Fitted linear decision function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearParameters {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LinearParameters {
    fn decision(&self, row: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias
    }
}

/// Per-class sample weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassWeights {
    /// Weight of label 0
    pub negative: f64,
    /// Weight of label 1
    pub positive: f64,
}

impl ClassWeights {
    /// Inverse-frequency weights: each class is weighted by the other's share
    pub fn balanced(labels: &[u8]) -> Result<Self, ClassifierError> {
        if labels.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        let total = labels.len() as f64;
        let positives = labels.iter().filter(|&&y| y == 1).count();
        let negatives = labels.len() - positives;

        if positives == 0 {
            return Err(ClassifierError::SingleClass(0));
        }
        if negatives == 0 {
            return Err(ClassifierError::SingleClass(1));
        }

        Ok(Self {
            negative: positives as f64 / total,
            positive: negatives as f64 / total,
        })
    }

    fn weight(&self, label: u8) -> f64 {
        if label == 1 {
            self.positive
        } else {
            self.negative
        }
    }
}

/// Summary of a fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub train_rows: usize,
    /// Rows set aside by the split; not evaluated
    pub held_out_rows: usize,
    pub class_weights: ClassWeights,
    pub iterations: usize,
    pub final_loss: f64,
    pub converged: bool,
}

/// Deterministic generator for the train/held-out shuffle (SplitMix64)
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform integer in `0..bound`
    fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}

/// Shuffled split of `0..n` into (train, held_out) index sets
fn train_test_split(n: usize, test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = SplitMix64::new(seed);
    for i in (1..n).rev() {
        let j = rng.below(i + 1);
        indices.swap(i, j);
    }

    let n_test = ((n as f64) * test_size).ceil() as usize;
    let train = indices.split_off(n_test.min(n));
    (train, indices)
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// ln(1 + e^z) without overflow
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

/// Binary delay classifier
///
/// Unfitted until [`DelayClassifier::fit`] succeeds; the fitted parameters
/// are never changed by prediction.
#[derive(Debug, Clone)]
pub struct DelayClassifier {
    config: ClassifierConfig,
    parameters: Option<LinearParameters>,
}

impl DelayClassifier {
    /// Create an unfitted classifier
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            parameters: None,
        }
    }

    /// Create a fitted classifier from known parameters
    pub fn from_parameters(parameters: LinearParameters) -> Self {
        Self {
            config: ClassifierConfig::default(),
            parameters: Some(parameters),
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.parameters.is_some()
    }

    pub fn parameters(&self) -> Option<&LinearParameters> {
        self.parameters.as_ref()
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Number of input columns the fitted model expects
    pub fn input_width(&self) -> Option<usize> {
        self.parameters.as_ref().map(|p| p.weights.len())
    }

    /// Fit on labelled rows
    pub fn fit(
        &mut self,
        features: &[FeatureVector],
        labels: &[u8],
    ) -> Result<FitReport, ClassifierError> {
        self.config.check()?;
        if features.len() != labels.len() {
            return Err(ClassifierError::RowCountMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }
        if features.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if let Some((row, &label)) = labels.iter().enumerate().find(|(_, &y)| y > 1) {
            return Err(ClassifierError::InvalidLabel { row, label });
        }

        let width = features[0].len();
        if let Some(row) = features.iter().find(|row| row.len() != width) {
            return Err(ClassifierError::InvalidInputShape {
                expected: width,
                actual: row.len(),
            });
        }

        let (train_idx, held_out_idx) =
            train_test_split(features.len(), self.config.test_size, self.config.seed);
        if train_idx.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        let rows: Vec<&[f64]> = train_idx.iter().map(|&i| features[i].values()).collect();
        let targets: Vec<u8> = train_idx.iter().map(|&i| labels[i]).collect();
        let class_weights = ClassWeights::balanced(&targets)?;
        let sample_weights: Vec<f64> = targets.iter().map(|&y| class_weights.weight(y)).collect();

        debug!(
            "Fitting on {} rows ({} held out), weights: negative={:.4}, positive={:.4}",
            rows.len(),
            held_out_idx.len(),
            class_weights.negative,
            class_weights.positive
        );

        let (parameters, iterations, final_loss, converged) =
            self.gradient_descent(&rows, &targets, &sample_weights, width);

        if !converged {
            warn!(
                "Gradient descent stopped after {} iterations without converging",
                iterations
            );
        }
        info!(
            "Classifier fitted: {} iterations, loss={:.6}",
            iterations, final_loss
        );

        self.parameters = Some(parameters);

        Ok(FitReport {
            train_rows: rows.len(),
            held_out_rows: held_out_idx.len(),
            class_weights,
            iterations,
            final_loss,
            converged,
        })
    }

    /// Weighted, L2-regularised full-batch gradient descent
    ///
    /// Minimises `(1/W) * sum(s_i * logloss_i) + ||w||^2 / (2 * C * W)` where
    /// `W` is the total sample weight.
    fn gradient_descent(
        &self,
        rows: &[&[f64]],
        targets: &[u8],
        sample_weights: &[f64],
        width: usize,
    ) -> (LinearParameters, usize, f64, bool) {
        let total_weight: f64 = sample_weights.iter().sum();
        let l2 = 1.0 / (self.config.regularization * total_weight);

        let mut params = LinearParameters {
            weights: vec![0.0; width],
            bias: 0.0,
        };
        let mut grad_w = vec![0.0; width];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            grad_w.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_b = 0.0;

            for ((row, &y), &s) in rows.iter().zip(targets).zip(sample_weights) {
                let error = s * (sigmoid(params.decision(row)) - f64::from(y));
                for (g, x) in grad_w.iter_mut().zip(row.iter()) {
                    *g += error * x;
                }
                grad_b += error;
            }

            let mut max_grad = (grad_b / total_weight).abs();
            for (g, w) in grad_w.iter_mut().zip(&params.weights) {
                *g = *g / total_weight + l2 * w;
                max_grad = max_grad.max(g.abs());
            }

            for (w, g) in params.weights.iter_mut().zip(&grad_w) {
                *w -= self.config.learning_rate * g;
            }
            params.bias -= self.config.learning_rate * grad_b / total_weight;
            iterations += 1;

            if max_grad < self.config.tolerance {
                converged = true;
                break;
            }
        }

        let data_loss: f64 = rows
            .iter()
            .zip(targets)
            .zip(sample_weights)
            .map(|((row, &y), &s)| {
                let z = params.decision(row);
                s * (softplus(z) - f64::from(y) * z)
            })
            .sum();
        let penalty: f64 = params.weights.iter().map(|w| w * w).sum::<f64>() * l2 / 2.0;

        (
            params,
            iterations,
            data_loss / total_weight + penalty,
            converged,
        )
    }

    fn fitted_for(&self, features: &[FeatureVector]) -> Result<&LinearParameters, ClassifierError> {
        let params = self.parameters.as_ref().ok_or(ClassifierError::NotFitted)?;
        if let Some(row) = features.iter().find(|row| row.len() != params.weights.len()) {
            return Err(ClassifierError::InvalidInputShape {
                expected: params.weights.len(),
                actual: row.len(),
            });
        }
        Ok(params)
    }

    /// Probability of delay per row
    pub fn predict_proba(&self, features: &[FeatureVector]) -> Result<Vec<f64>, ClassifierError> {
        let params = self.fitted_for(features)?;
        Ok(features
            .iter()
            .map(|row| sigmoid(params.decision(row.values())))
            .collect())
    }

    /// Delay label per row, same order as the input
    pub fn predict(&self, features: &[FeatureVector]) -> Result<Vec<u8>, ClassifierError> {
        let params = self.fitted_for(features)?;
        Ok(features
            .iter()
            .map(|row| u8::from(params.decision(row.values()) > 0.0))
            .collect())
    }
}

impl Default for DelayClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

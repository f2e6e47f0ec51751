//! Multinomial logistic regression over TF-IDF features.

use serde::{Deserialize, Serialize};

use crate::error::{KaisangError, Result};

/// Default maximum number of gradient descent iterations.
const DEFAULT_MAX_ITERATIONS: usize = 1000;
/// Default learning rate for full-batch gradient descent.
const DEFAULT_LEARNING_RATE: f64 = 0.5;
/// Default convergence tolerance on the gradient infinity norm.
const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Fitted classifier state: one weight vector plus bias per class, in
/// first-seen label order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LogisticState {
    /// Class labels in training order. Prediction ties resolve to the
    /// earliest entry.
    pub classes: Vec<String>,
    /// Weight matrix, one row per class, one column per feature.
    pub weights: Vec<Vec<f64>>,
    /// Per-class bias terms.
    pub biases: Vec<f64>,
}

/// Training statistics recorded by `fit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Number of gradient descent iterations completed.
    pub iterations: usize,
    /// Final mean cross-entropy loss.
    pub final_loss: f64,
    /// Whether the gradient tolerance was reached before the iteration bound.
    pub converged: bool,
}

/// Multinomial logistic regression classifier.
///
/// Training minimizes softmax cross-entropy by full-batch gradient descent,
/// stopping at convergence or after `max_iterations`. Prediction is the
/// arg-max of per-class linear scores and is fully deterministic given
/// identical weights and input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    max_iterations: usize,
    learning_rate: f64,
    tolerance: f64,
    state: Option<LogisticState>,
    training_stats: Option<TrainingStats>,
}

impl LogisticRegression {
    /// Create a new untrained classifier with default hyperparameters.
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            learning_rate: DEFAULT_LEARNING_RATE,
            tolerance: DEFAULT_TOLERANCE,
            state: None,
            training_stats: None,
        }
    }

    /// Create a classifier with custom hyperparameters.
    pub fn with_params(max_iterations: usize, learning_rate: f64, tolerance: f64) -> Self {
        Self {
            max_iterations,
            learning_rate,
            tolerance,
            state: None,
            training_stats: None,
        }
    }

    /// Fit the classifier on feature vectors and their labels.
    ///
    /// The class list is fixed in first-seen label order and never reordered
    /// afterwards, so arg-max tie-breaking is stable across runs.
    pub fn fit(&mut self, features: &[Vec<f64>], labels: &[String]) -> Result<TrainingStats> {
        if features.is_empty() {
            return Err(KaisangError::training("no training samples"));
        }
        if features.len() != labels.len() {
            return Err(KaisangError::training(format!(
                "feature/label length mismatch: {} vs {}",
                features.len(),
                labels.len()
            )));
        }
        let n_features = features[0].len();
        if features.iter().any(|f| f.len() != n_features) {
            return Err(KaisangError::training(
                "inconsistent feature vector dimensions",
            ));
        }

        // Classes in first-seen label order
        let mut classes: Vec<String> = Vec::new();
        let mut class_index = std::collections::HashMap::new();
        for label in labels {
            if !class_index.contains_key(label) {
                class_index.insert(label.clone(), classes.len());
                classes.push(label.clone());
            }
        }
        let n_classes = classes.len();
        let n_samples = features.len();
        let targets: Vec<usize> = labels.iter().map(|l| class_index[l]).collect();

        let mut weights = vec![vec![0.0; n_features]; n_classes];
        let mut biases = vec![0.0; n_classes];

        let mut iterations = 0;
        let mut final_loss = f64::INFINITY;
        let mut converged = false;

        for _ in 0..self.max_iterations {
            iterations += 1;

            let mut grad_w = vec![vec![0.0; n_features]; n_classes];
            let mut grad_b = vec![0.0; n_classes];
            let mut loss = 0.0;

            for (x, &target) in features.iter().zip(targets.iter()) {
                let probs = softmax(&scores(&weights, &biases, x));
                loss -= probs[target].max(1e-12).ln();

                for c in 0..n_classes {
                    let delta = probs[c] - if c == target { 1.0 } else { 0.0 };
                    grad_b[c] += delta;
                    for (gw, &xj) in grad_w[c].iter_mut().zip(x.iter()) {
                        *gw += delta * xj;
                    }
                }
            }

            let scale = 1.0 / n_samples as f64;
            final_loss = loss * scale;

            let mut max_grad: f64 = 0.0;
            for c in 0..n_classes {
                grad_b[c] *= scale;
                max_grad = max_grad.max(grad_b[c].abs());
                for gw in grad_w[c].iter_mut() {
                    *gw *= scale;
                    max_grad = max_grad.max(gw.abs());
                }
            }

            if max_grad < self.tolerance {
                converged = true;
                break;
            }

            for c in 0..n_classes {
                biases[c] -= self.learning_rate * grad_b[c];
                for (w, gw) in weights[c].iter_mut().zip(grad_w[c].iter()) {
                    *w -= self.learning_rate * gw;
                }
            }
        }

        let stats = TrainingStats {
            iterations,
            final_loss,
            converged,
        };

        self.state = Some(LogisticState {
            classes,
            weights,
            biases,
        });
        self.training_stats = Some(stats.clone());

        Ok(stats)
    }

    /// Predict the label for a feature vector.
    ///
    /// The zero vector is valid input: scores reduce to the biases and the
    /// arg-max is still deterministic.
    pub fn predict(&self, features: &[f64]) -> Result<String> {
        let state = self.state()?;
        let scores = self.decision_function(features)?;

        let mut best = 0;
        for (idx, &score) in scores.iter().enumerate().skip(1) {
            // Strict comparison keeps the earliest class on ties
            if score > scores[best] {
                best = idx;
            }
        }

        Ok(state.classes[best].clone())
    }

    /// Per-class linear scores `w_c . x + b_c`, in class order.
    pub fn decision_function(&self, features: &[f64]) -> Result<Vec<f64>> {
        let state = self.state()?;
        let n_features = state.weights.first().map_or(0, |w| w.len());
        if features.len() != n_features {
            return Err(KaisangError::training(format!(
                "feature vector has {} dimensions, classifier expects {}",
                features.len(),
                n_features
            )));
        }
        Ok(scores(&state.weights, &state.biases, features))
    }

    /// Class labels in training order.
    pub fn classes(&self) -> Result<&[String]> {
        Ok(&self.state()?.classes)
    }

    /// Whether the classifier has been fitted (or loaded from artifacts).
    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    /// Statistics from the most recent `fit`, if any.
    pub fn training_stats(&self) -> Option<&TrainingStats> {
        self.training_stats.as_ref()
    }

    fn state(&self) -> Result<&LogisticState> {
        self.state
            .as_ref()
            .ok_or_else(|| KaisangError::unfitted("classifier used before fit"))
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-class linear scores.
fn scores(weights: &[Vec<f64>], biases: &[f64], x: &[f64]) -> Vec<f64> {
    weights
        .iter()
        .zip(biases.iter())
        .map(|(w, &b)| w.iter().zip(x.iter()).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
        .collect()
}

/// Numerically stable softmax.
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Vec<Vec<f64>>, Vec<String>) {
        // Two linearly separable one-hot classes
        let features = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.9, 0.1, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.1, 0.9],
        ];
        let labels = vec![
            "greeting".to_string(),
            "greeting".to_string(),
            "bye".to_string(),
            "bye".to_string(),
        ];
        (features, labels)
    }

    #[test]
    fn test_fit_and_predict() {
        let (features, labels) = fixture();
        let mut clf = LogisticRegression::new();
        clf.fit(&features, &labels).unwrap();

        assert_eq!(clf.predict(&[1.0, 0.0, 0.0]).unwrap(), "greeting");
        assert_eq!(clf.predict(&[0.0, 0.0, 1.0]).unwrap(), "bye");
    }

    #[test]
    fn test_classes_in_training_order() {
        let (features, labels) = fixture();
        let mut clf = LogisticRegression::new();
        clf.fit(&features, &labels).unwrap();

        assert_eq!(clf.classes().unwrap(), &["greeting", "bye"]);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let (features, labels) = fixture();
        let mut clf = LogisticRegression::new();
        clf.fit(&features, &labels).unwrap();

        let a = clf.predict(&[0.5, 0.5, 0.0]).unwrap();
        for _ in 0..10 {
            assert_eq!(clf.predict(&[0.5, 0.5, 0.0]).unwrap(), a);
        }
    }

    #[test]
    fn test_exact_tie_resolves_to_first_class() {
        let (features, labels) = fixture();
        // Zero iterations leave all weights and biases at zero: every input
        // scores an exact tie across classes.
        let mut clf = LogisticRegression::with_params(0, 0.5, 1e-5);
        clf.fit(&features, &labels).unwrap();

        assert_eq!(clf.predict(&[0.0, 0.0, 0.0]).unwrap(), "greeting");
        assert_eq!(clf.predict(&[0.3, 0.3, 0.3]).unwrap(), "greeting");
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let clf = LogisticRegression::new();
        let err = clf.predict(&[0.0]).unwrap_err();
        assert!(matches!(err, KaisangError::UnfittedModel(_)));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let (features, labels) = fixture();
        let mut clf = LogisticRegression::new();
        clf.fit(&features, &labels).unwrap();

        assert!(clf.predict(&[1.0, 0.0]).is_err());
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let mut clf = LogisticRegression::new();
        let err = clf
            .fit(&[vec![1.0]], &["a".to_string(), "b".to_string()])
            .unwrap_err();
        assert!(matches!(err, KaisangError::Training(_)));
    }

    #[test]
    fn test_training_stats_recorded() {
        let (features, labels) = fixture();
        let mut clf = LogisticRegression::new();
        let stats = clf.fit(&features, &labels).unwrap();

        assert!(stats.iterations > 0);
        assert!(stats.iterations <= 1000);
        assert!(stats.final_loss.is_finite());
        assert!(clf.training_stats().is_some());
    }
}

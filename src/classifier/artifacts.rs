//! Trained artifact bundle: persistence for the vectorizer and classifier.
//!
//! A training run produces three files in the models directory:
//!
//! - `vectorizer.bin`: fitted vectorizer state (bincode)
//! - `classifier.bin`: fitted classifier (bincode)
//! - `metadata.json`: human-readable training metadata
//!
//! The binary blobs round-trip the vocabulary, IDF weights, and weight
//! matrix exactly. Artifacts are loaded once at process start and shared
//! read-only; replacing a model means re-training and re-saving the whole
//! bundle.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::StandardAnalyzer;
use crate::classifier::logistic::{LogisticRegression, TrainingStats};
use crate::classifier::vectorizer::{TfIdfVectorizer, VectorizerState};
use crate::error::{KaisangError, Result};
use crate::intent::IntentSet;

/// File name of the serialized vectorizer state.
pub const VECTORIZER_FILE: &str = "vectorizer.bin";
/// File name of the serialized classifier.
pub const CLASSIFIER_FILE: &str = "classifier.bin";
/// File name of the training metadata document.
pub const METADATA_FILE: &str = "metadata.json";

/// Metadata describing a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Training timestamp.
    pub trained_at: chrono::DateTime<chrono::Utc>,
    /// Number of training samples (patterns across all intents).
    pub samples: usize,
    /// Size of the fitted vocabulary.
    pub vocabulary_size: usize,
    /// Class labels in training order.
    pub classes: Vec<String>,
    /// Optimizer statistics.
    pub stats: TrainingStats,
}

/// The trained (vectorizer, classifier) bundle.
#[derive(Debug)]
pub struct TrainedArtifacts {
    /// Fitted TF-IDF vectorizer.
    pub vectorizer: TfIdfVectorizer,
    /// Fitted logistic regression classifier.
    pub classifier: LogisticRegression,
    /// Metadata recorded at training time.
    pub metadata: ArtifactMetadata,
}

impl TrainedArtifacts {
    /// Train a new artifact bundle from an intent configuration.
    pub fn train(intents: &IntentSet) -> Result<Self> {
        let (texts, labels) = intents.training_pairs();

        let mut vectorizer = TfIdfVectorizer::standard()?;
        vectorizer.fit(&texts)?;

        let features = texts
            .iter()
            .map(|text| vectorizer.transform(text))
            .collect::<Result<Vec<_>>>()?;

        let mut classifier = LogisticRegression::new();
        let stats = classifier.fit(&features, &labels)?;

        let metadata = ArtifactMetadata {
            trained_at: chrono::Utc::now(),
            samples: texts.len(),
            vocabulary_size: vectorizer.vocabulary_size(),
            classes: classifier.classes()?.to_vec(),
            stats,
        };

        Ok(Self {
            vectorizer,
            classifier,
            metadata,
        })
    }

    /// Save the bundle to a models directory, creating it if needed.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let vectorizer_blob = bincode::serialize(self.vectorizer.state()?)?;
        std::fs::write(dir.join(VECTORIZER_FILE), vectorizer_blob)?;

        let classifier_blob = bincode::serialize(&self.classifier)?;
        std::fs::write(dir.join(CLASSIFIER_FILE), classifier_blob)?;

        let metadata_json = serde_json::to_string_pretty(&self.metadata)?;
        std::fs::write(dir.join(METADATA_FILE), metadata_json)?;

        Ok(())
    }

    /// Load a bundle from a models directory.
    ///
    /// Fatal at startup if any file is missing or unreadable: the serving
    /// responder must never start with an unfitted model.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        let vectorizer_blob = std::fs::read(dir.join(VECTORIZER_FILE)).map_err(|e| {
            KaisangError::unfitted(format!(
                "cannot read {}: {e}",
                dir.join(VECTORIZER_FILE).display()
            ))
        })?;
        let state: VectorizerState = bincode::deserialize(&vectorizer_blob)?;
        let vectorizer = TfIdfVectorizer::from_state(Arc::new(StandardAnalyzer::new()?), state);

        let classifier_blob = std::fs::read(dir.join(CLASSIFIER_FILE)).map_err(|e| {
            KaisangError::unfitted(format!(
                "cannot read {}: {e}",
                dir.join(CLASSIFIER_FILE).display()
            ))
        })?;
        let classifier: LogisticRegression = bincode::deserialize(&classifier_blob)?;
        if !classifier.is_trained() {
            return Err(KaisangError::unfitted("classifier artifact is untrained"));
        }

        let metadata_json = std::fs::read_to_string(dir.join(METADATA_FILE))?;
        let metadata: ArtifactMetadata = serde_json::from_str(&metadata_json)?;

        Ok(Self {
            vectorizer,
            classifier,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture_intents() -> IntentSet {
        IntentSet::from_json(
            r#"{
                "intents": [
                    {"tag": "greeting", "patterns": ["hi", "hello"], "responses": ["Hi there!"]},
                    {"tag": "bye", "patterns": ["bye", "goodbye"], "responses": ["See you!"]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_train_classifies_fixture() {
        let artifacts = TrainedArtifacts::train(&fixture_intents()).unwrap();

        let features = artifacts.vectorizer.transform("hello").unwrap();
        assert_eq!(artifacts.classifier.predict(&features).unwrap(), "greeting");

        let features = artifacts.vectorizer.transform("goodbye").unwrap();
        assert_eq!(artifacts.classifier.predict(&features).unwrap(), "bye");
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let artifacts = TrainedArtifacts::train(&fixture_intents()).unwrap();
        artifacts.save(dir.path()).unwrap();

        let loaded = TrainedArtifacts::load(dir.path()).unwrap();
        assert_eq!(
            loaded.vectorizer.vocabulary_size(),
            artifacts.vectorizer.vocabulary_size()
        );
        assert_eq!(loaded.metadata.classes, artifacts.metadata.classes);

        // Identical state must produce identical predictions and scores
        for text in ["hello", "goodbye", "hi friend", ""] {
            let a = artifacts.vectorizer.transform(text).unwrap();
            let b = loaded.vectorizer.transform(text).unwrap();
            assert_eq!(a, b);
            assert_eq!(
                artifacts.classifier.decision_function(&a).unwrap(),
                loaded.classifier.decision_function(&b).unwrap()
            );
        }
    }

    #[test]
    fn test_load_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = TrainedArtifacts::load(&missing).unwrap_err();
        assert!(matches!(err, KaisangError::UnfittedModel(_)));
    }
}

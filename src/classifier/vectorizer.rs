//! TF-IDF vectorizer for text feature extraction.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::error::{KaisangError, Result};

/// Fitted vectorizer state: everything that must round-trip through the
/// artifact files exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct VectorizerState {
    /// Vocabulary: token -> feature index, assigned in first-seen order.
    pub vocabulary: HashMap<String, usize>,
    /// Smoothed inverse document frequency per feature index.
    pub idf: Vec<f64>,
    /// Total number of documents seen during fitting.
    pub n_documents: usize,
}

/// TF-IDF vectorizer for text feature extraction.
///
/// `fit` builds the vocabulary and IDF table from a training corpus;
/// `transform` maps text into an L2-normalized feature vector using the
/// fitted state. Transforming before fitting fails with
/// [`KaisangError::UnfittedModel`].
pub struct TfIdfVectorizer {
    /// Analyzer for tokenization; the same instance serves fit and transform.
    analyzer: Arc<dyn Analyzer>,
    /// Fitted state, absent until `fit` succeeds.
    state: Option<VectorizerState>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary_size())
            .field("fitted", &self.state.is_some())
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create a new unfitted TF-IDF vectorizer with the specified analyzer.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            analyzer,
            state: None,
        }
    }

    /// Create a new unfitted vectorizer with the standard analyzer.
    pub fn standard() -> Result<Self> {
        Ok(Self::new(Arc::new(StandardAnalyzer::new()?)))
    }

    /// Reconstruct a fitted vectorizer from persisted state.
    pub(crate) fn from_state(analyzer: Arc<dyn Analyzer>, state: VectorizerState) -> Self {
        Self {
            analyzer,
            state: Some(state),
        }
    }

    /// Fit the vectorizer on training documents.
    ///
    /// The vocabulary is assigned indices in first-seen token order, which
    /// makes the feature space deterministic for a given corpus. IDF uses
    /// the smoothed form `ln((1 + N) / (1 + df)) + 1`.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        let n_documents = documents.len();
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let tokens = self.tokenize(doc)?;
            let mut seen_in_doc = std::collections::HashSet::new();

            for token in tokens {
                if !vocabulary.contains_key(&token) {
                    let idx = vocabulary.len();
                    vocabulary.insert(token.clone(), idx);
                }
                if seen_in_doc.insert(token.clone()) {
                    *document_frequency.entry(token).or_insert(0) += 1;
                }
            }
        }

        let mut idf = vec![0.0; vocabulary.len()];
        for (word, &idx) in &vocabulary {
            let df = document_frequency.get(word).copied().unwrap_or(0);
            idf[idx] = ((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0;
        }

        self.state = Some(VectorizerState {
            vocabulary,
            idf,
            n_documents,
        });

        Ok(())
    }

    /// Transform a document into an L2-normalized TF-IDF feature vector.
    ///
    /// Tokens outside the fitted vocabulary contribute nothing; an input
    /// with no known tokens transforms to the zero vector. Never mutates
    /// fitted state.
    pub fn transform(&self, document: &str) -> Result<Vec<f64>> {
        let state = self.state()?;
        let tokens = self.tokenize(document)?;
        let mut features = vec![0.0; state.vocabulary.len()];

        // Raw term counts
        for token in &tokens {
            if let Some(&idx) = state.vocabulary.get(token) {
                features[idx] += 1.0;
            }
        }

        // Apply IDF
        for (idx, value) in features.iter_mut().enumerate() {
            *value *= state.idf[idx];
        }

        // L2 normalization
        let norm: f64 = features.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }

        Ok(features)
    }

    /// Get the size of the fitted vocabulary (0 before fitting).
    pub fn vocabulary_size(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.vocabulary.len())
    }

    /// Whether `fit` has been called (or state was loaded from artifacts).
    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Borrow the fitted state or fail with `UnfittedModel`.
    pub(crate) fn state(&self) -> Result<&VectorizerState> {
        self.state
            .as_ref()
            .ok_or_else(|| KaisangError::unfitted("vectorizer used before fit"))
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyzer.analyze(text)?.map(|token| token.text).collect())
    }
}

//! The responder: classify free text, answer with a canned response.
//!
//! # Architecture
//!
//! - [`Responder`]: composes the trained artifacts with a
//!   [`ResponseSelector`]
//! - [`ResponseSelector`]: uniform random choice over a tag's responses,
//!   emoji stripped
//! - [`emoji::remove_emojis`]: pictograph stripping
//!
//! A responder is built once at process start from the artifact bundle and
//! the intent configuration, then shared read-only across requests. Aside
//! from the random response choice, `respond` is a pure function of its
//! input and the loaded state.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use kaisang::classifier::TrainedArtifacts;
//! use kaisang::intent::IntentSet;
//! use kaisang::responder::Responder;
//!
//! # fn main() -> kaisang::error::Result<()> {
//! let intents = Arc::new(IntentSet::load("data/intents.json")?);
//! let artifacts = TrainedArtifacts::load("models")?;
//! let responder = Responder::new(artifacts, intents);
//!
//! let reply = responder.respond("hello there");
//! # Ok(())
//! # }
//! ```

pub mod emoji;
pub mod selector;

pub use selector::{FALLBACK_RESPONSE, ResponseSelector};

use std::path::Path;
use std::sync::Arc;

use rand::Rng;

use crate::classifier::TrainedArtifacts;
use crate::error::Result;
use crate::intent::IntentSet;

/// Turns free text into a reply using the trained classifier pipeline.
#[derive(Debug)]
pub struct Responder {
    artifacts: TrainedArtifacts,
    selector: ResponseSelector,
}

impl Responder {
    /// Build a responder from a trained artifact bundle and intent set.
    pub fn new(artifacts: TrainedArtifacts, intents: Arc<IntentSet>) -> Self {
        Self {
            artifacts,
            selector: ResponseSelector::new(intents),
        }
    }

    /// Load artifacts and intents from disk and build a responder.
    ///
    /// Fatal if either resource is missing: a serving process must not start
    /// with an unfitted model.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(models_dir: P, intents_path: Q) -> Result<Self> {
        let artifacts = TrainedArtifacts::load(models_dir)?;
        let intents = Arc::new(IntentSet::load(intents_path)?);
        Ok(Self::new(artifacts, intents))
    }

    /// Produce a reply for the given input text.
    ///
    /// Never fails: classification errors resolve to the fallback response,
    /// and empty or whitespace-only input transforms to the zero vector,
    /// which still scores deterministically against every tag.
    pub fn respond(&self, text: &str) -> String {
        self.respond_with(text, &mut rand::rng())
    }

    /// Produce a reply using the provided random source for selection.
    pub fn respond_with<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> String {
        match self.classify(text) {
            Ok(tag) => self.selector.select_with(&tag, rng),
            Err(_) => FALLBACK_RESPONSE.to_string(),
        }
    }

    /// Predict the intent tag for the given text.
    ///
    /// Deterministic: identical artifacts and input always yield the same
    /// tag. Randomness only enters at response selection.
    pub fn classify(&self, text: &str) -> Result<String> {
        let features = self.artifacts.vectorizer.transform(text)?;
        self.artifacts.classifier.predict(&features)
    }

    /// The trained artifact bundle backing this responder.
    pub fn artifacts(&self) -> &TrainedArtifacts {
        &self.artifacts
    }

    /// The intent set backing this responder.
    pub fn intents(&self) -> &Arc<IntentSet> {
        self.selector.intents()
    }
}

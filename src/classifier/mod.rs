//! Intent classification: TF-IDF features and a linear classifier.
//!
//! # Architecture
//!
//! - [`TfIdfVectorizer`]: feature extraction (fit on the pattern corpus,
//!   transform at inference time)
//! - [`LogisticRegression`]: multinomial logistic regression over the
//!   TF-IDF feature space
//! - [`TrainedArtifacts`]: the serializable (vectorizer, classifier) bundle
//!   produced by an offline training run and loaded read-only at startup
//!
//! # Example
//!
//! ```rust,no_run
//! use kaisang::classifier::TrainedArtifacts;
//! use kaisang::intent::IntentSet;
//!
//! # fn main() -> kaisang::error::Result<()> {
//! let intents = IntentSet::load("data/intents.json")?;
//! let artifacts = TrainedArtifacts::train(&intents)?;
//! artifacts.save("models")?;
//!
//! let artifacts = TrainedArtifacts::load("models")?;
//! let features = artifacts.vectorizer.transform("hello there")?;
//! let tag = artifacts.classifier.predict(&features)?;
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod logistic;
pub mod vectorizer;

pub use artifacts::{ArtifactMetadata, TrainedArtifacts};
pub use logistic::{LogisticRegression, TrainingStats};
pub use vectorizer::TfIdfVectorizer;

//! Intent configuration: the single source of truth for training and serving.
//!
//! An intent file is a JSON document with a top-level `intents` list:
//!
//! ```json
//! {
//!   "intents": [
//!     {
//!       "tag": "greeting",
//!       "patterns": ["hi", "hello"],
//!       "responses": ["Hi there!"]
//!     }
//!   ]
//! }
//! ```
//!
//! `patterns` are training input only; `responses` are the candidate replies
//! the [`ResponseSelector`](crate::responder::ResponseSelector) samples from.
//! An [`IntentSet`] is immutable after load.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KaisangError, Result};

/// A single recognized category of user input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Unique identifier for this intent.
    pub tag: String,
    /// Example inputs used only at training time.
    pub patterns: Vec<String>,
    /// Candidate replies for this intent.
    pub responses: Vec<String>,
}

/// On-disk representation of the intent configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IntentFile {
    intents: Vec<Intent>,
}

/// A validated, immutable collection of intents with lookup by tag.
#[derive(Debug, Clone)]
pub struct IntentSet {
    intents: Vec<Intent>,
    by_tag: HashMap<String, usize>,
}

impl IntentSet {
    /// Build an intent set from already-parsed intents, validating each one.
    ///
    /// Validation is fatal: an intent with an empty `tag`, `patterns`, or
    /// `responses`, or a duplicated tag, aborts training before any artifact
    /// is produced.
    pub fn from_intents(intents: Vec<Intent>) -> Result<Self> {
        if intents.is_empty() {
            return Err(KaisangError::config("intent list is empty"));
        }

        let mut by_tag = HashMap::with_capacity(intents.len());
        for (idx, intent) in intents.iter().enumerate() {
            if intent.tag.trim().is_empty() {
                return Err(KaisangError::config(format!(
                    "intent #{idx} has an empty tag"
                )));
            }
            if intent.patterns.is_empty() {
                return Err(KaisangError::config(format!(
                    "intent '{}' has no patterns",
                    intent.tag
                )));
            }
            if intent.responses.is_empty() {
                return Err(KaisangError::config(format!(
                    "intent '{}' has no responses",
                    intent.tag
                )));
            }
            if by_tag.insert(intent.tag.clone(), idx).is_some() {
                return Err(KaisangError::config(format!(
                    "duplicate intent tag '{}'",
                    intent.tag
                )));
            }
        }

        Ok(IntentSet { intents, by_tag })
    }

    /// Parse an intent set from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: IntentFile = serde_json::from_str(json)?;
        Self::from_intents(file.intents)
    }

    /// Load an intent set from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            KaisangError::config(format!(
                "cannot read intents file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_json(&content)
    }

    /// Look up an intent by tag.
    pub fn get(&self, tag: &str) -> Option<&Intent> {
        self.by_tag.get(tag).map(|&idx| &self.intents[idx])
    }

    /// Iterate over all intents in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Intent> {
        self.intents.iter()
    }

    /// Number of configured intents.
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Check whether the set contains no intents.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Flatten the configuration into training pairs.
    ///
    /// Returns one `(text, label)` pair per pattern, in configuration order,
    /// so vocabulary and class ordering are deterministic across runs.
    pub fn training_pairs(&self) -> (Vec<String>, Vec<String>) {
        let mut texts = Vec::new();
        let mut labels = Vec::new();

        for intent in &self.intents {
            for pattern in &intent.patterns {
                texts.push(pattern.clone());
                labels.push(intent.tag.clone());
            }
        }

        (texts, labels)
    }
}

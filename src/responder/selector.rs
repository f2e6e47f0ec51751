//! Response selection for predicted intent tags.

use std::sync::Arc;

use rand::Rng;

use crate::intent::IntentSet;
use crate::responder::emoji::remove_emojis;

/// Reply used when a predicted tag has no configured intent.
///
/// With a fixed label set this path should be unreachable, but the selector
/// handles it rather than trusting the classifier's output.
pub const FALLBACK_RESPONSE: &str = "I don't understand...";

/// Selects a canned response for an intent tag.
///
/// Selection is uniform over the tag's `responses` list, and the chosen
/// reply has emoji stripped before it is returned. The randomness source is
/// injectable so tests can pin the choice with a seeded generator.
#[derive(Debug, Clone)]
pub struct ResponseSelector {
    intents: Arc<IntentSet>,
}

impl ResponseSelector {
    /// Create a selector over the given intent set.
    pub fn new(intents: Arc<IntentSet>) -> Self {
        Self { intents }
    }

    /// Select a response for `tag` using the process-wide random source.
    pub fn select(&self, tag: &str) -> String {
        self.select_with(tag, &mut rand::rng())
    }

    /// Select a response for `tag` using the provided random source.
    pub fn select_with<R: Rng + ?Sized>(&self, tag: &str, rng: &mut R) -> String {
        match self.intents.get(tag) {
            Some(intent) if !intent.responses.is_empty() => {
                let idx = rng.random_range(0..intent.responses.len());
                remove_emojis(&intent.responses[idx])
            }
            _ => FALLBACK_RESPONSE.to_string(),
        }
    }

    /// The intent set this selector draws from.
    pub fn intents(&self) -> &Arc<IntentSet> {
        &self.intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn intents() -> Arc<IntentSet> {
        Arc::new(
            IntentSet::from_json(
                r#"{
                    "intents": [
                        {
                            "tag": "greeting",
                            "patterns": ["hi"],
                            "responses": ["Hi there! 😀", "Hello! 👋"]
                        }
                    ]
                }"#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_selected_response_belongs_to_tag() {
        let selector = ResponseSelector::new(intents());

        for _ in 0..50 {
            let response = selector.select("greeting");
            assert!(response == "Hi there! " || response == "Hello! ");
        }
    }

    #[test]
    fn test_emoji_are_stripped() {
        let selector = ResponseSelector::new(intents());
        let response = selector.select("greeting");
        assert!(!response.contains('\u{1F600}'));
        assert!(!response.contains('\u{1F44B}'));
    }

    #[test]
    fn test_unknown_tag_falls_back() {
        let selector = ResponseSelector::new(intents());
        assert_eq!(selector.select("no-such-tag"), FALLBACK_RESPONSE);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let selector = ResponseSelector::new(intents());

        let a = selector.select_with("greeting", &mut StdRng::seed_from_u64(7));
        let b = selector.select_with("greeting", &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}

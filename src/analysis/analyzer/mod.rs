//! Analyzers combine a tokenizer with a chain of filters.
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → Token Stream
//! ```

pub mod pipeline;
pub mod standard;

pub use pipeline::PipelineAnalyzer;
pub use standard::StandardAnalyzer;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so a single analyzer can be shared by
/// concurrent classification requests.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

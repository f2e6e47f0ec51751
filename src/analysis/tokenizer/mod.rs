//! Tokenizers split raw text into token streams.

pub mod regex;

pub use regex::RegexTokenizer;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that split text into tokens.
///
/// Tokenizers are `Send + Sync` so a single instance can serve concurrent
/// classification requests.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

//! Token filters transform token streams after tokenization.

pub mod lowercase;

pub use lowercase::LowercaseFilter;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform a token stream.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream, producing a new stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

//! Text analysis pipeline for intent classification.
//!
//! Raw text flows through a [`Tokenizer`](tokenizer::Tokenizer) and a chain
//! of [`Filter`](token_filter::Filter)s, combined by an
//! [`Analyzer`](analyzer::Analyzer). The classifier only ever sees the
//! output of an analyzer, so training and inference tokenize identically.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer, StandardAnalyzer};
pub use token::{Token, TokenStream};

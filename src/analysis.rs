//! Text analysis module for Sieve.
//!
//! Turns raw text into the normalized tokens the classifier counts. The
//! pipeline is a tokenizer followed by a chain of token filters, combined
//! behind the [`Analyzer`] trait.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;

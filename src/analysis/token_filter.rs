//! Token filter implementations for token transformation.
//!
//! Filters run after the tokenizer and rewrite tokens. The only one needed
//! today is [`lowercase::LowercaseFilter`] (full Unicode lowercasing).
//!
//! # Examples
//!
//! ```
//! use sieve::analysis::token_filter::Filter;
//! use sieve::analysis::token_filter::lowercase::LowercaseFilter;
//! use sieve::analysis::token::Token;
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("Nature", 0), Token::new("IS", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "nature");
//! assert_eq!(filtered[1].text, "is");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;

pub use lowercase::LowercaseFilter;

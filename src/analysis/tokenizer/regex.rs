//! Regex-based tokenizer implementation.

use std::sync::Arc;

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{Result, SieveError};

/// Pattern matching one maximal run of word characters.
///
/// `\w` is Unicode-aware in the `regex` crate: alphanumerics, marks,
/// connector punctuation (including `_`).
pub const WORD_PATTERN: &str = r"\w+";

/// A tokenizer that emits every match of a regular expression as a token.
///
/// With the default [`WORD_PATTERN`] the text between matches is exactly the
/// runs of non-word characters, so those runs act as separators and empty
/// segments never appear.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    pattern: Arc<Regex>,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer matching runs of word characters.
    pub fn new() -> Result<Self> {
        Self::with_pattern(WORD_PATTERN)
    }

    /// Create a new regex tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(SieveError::analysis("Token pattern must not be empty"));
        }
        let regex = Regex::new(pattern)
            .map_err(|e| SieveError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
        })
    }
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        Self::new().expect("Default regex pattern should be valid")
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .pattern
            .find_iter(text)
            .filter(|mat| mat.start() < mat.end())
            .enumerate()
            .map(|(position, mat)| {
                Token::with_offsets(mat.as_str(), position, mat.start(), mat.end())
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

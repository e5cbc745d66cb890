//! Standard analyzer used by the classifier.
//!
//! Splits text on runs of non-word characters and lowercases every token.
//! This is the tokenization the classifier trains and
//! scores with unless configured otherwise.
//!
//! # Examples
//!
//! ```
//! use sieve::analysis::analyzer::{Analyzer, StandardAnalyzer};
//!
//! let analyzer = StandardAnalyzer::new().unwrap();
//! let terms = analyzer.analyze_terms("Nature is... BEAUTIFUL").unwrap();
//! assert_eq!(terms, vec!["nature", "is", "beautiful"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::tokenizer::regex::{RegexTokenizer, WORD_PATTERN};
use crate::error::Result;

/// A standard analyzer: regex word tokenizer followed by lowercasing.
pub struct StandardAnalyzer {
    inner: PipelineAnalyzer,
}

impl StandardAnalyzer {
    /// Create a new standard analyzer with default settings.
    pub fn new() -> Result<Self> {
        Self::with_options(WORD_PATTERN, true)
    }

    /// Create a standard analyzer with a custom token pattern and optional
    /// lowercasing.
    pub fn with_options(token_pattern: &str, lowercase: bool) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::with_pattern(token_pattern)?);
        let mut analyzer = PipelineAnalyzer::new(tokenizer);
        if lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        Ok(StandardAnalyzer { inner: analyzer })
    }
}

impl Default for StandardAnalyzer {
    fn default() -> Self {
        Self::new().expect("Standard analyzer should be creatable with default settings")
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

impl std::fmt::Debug for StandardAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_standard_analyzer() {
        let analyzer = StandardAnalyzer::new().unwrap();

        let tokens: Vec<Token> = analyzer
            .analyze("Hello, the World -- and TEST_case!")
            .unwrap()
            .collect();

        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "the");
        assert_eq!(tokens[2].text, "world");
        assert_eq!(tokens[3].text, "and");
        assert_eq!(tokens[4].text, "test_case");
    }

    #[test]
    fn test_repeated_tokens_are_kept() {
        let analyzer = StandardAnalyzer::new().unwrap();
        let terms = analyzer.analyze_terms("amen Amen AMEN").unwrap();
        assert_eq!(terms, vec!["amen", "amen", "amen"]);
    }

    #[test]
    fn test_empty_and_symbol_only_text() {
        let analyzer = StandardAnalyzer::new().unwrap();
        assert!(analyzer.analyze_terms("").unwrap().is_empty());
        assert!(analyzer.analyze_terms("?!... --- ***").unwrap().is_empty());
    }

    #[test]
    fn test_tokenization_is_idempotent() {
        let analyzer = StandardAnalyzer::new().unwrap();
        let inputs = [
            "God is REAL",
            "  prayer,,works!!  ",
            "mixed_Case words: 123 and Ünïcödé",
            "ǅemal ᾼ İstanbul",
            "ΣΟΦΙΑ ὈΔΥΣΣΕΎΣ",
            "",
        ];

        for input in inputs {
            let once = analyzer.analyze_terms(input).unwrap();
            let twice = analyzer.analyze_terms(&once.join(" ")).unwrap();
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_titlecase_and_dotted_capitals_are_lowered() {
        let analyzer = StandardAnalyzer::new().unwrap();
        assert_eq!(
            analyzer.analyze_terms("ǅemal ᾼ").unwrap(),
            vec!["ǆemal", "ᾳ"]
        );
        assert_eq!(
            analyzer.analyze_terms("ǅemal").unwrap(),
            analyzer.analyze_terms("ǆemal").unwrap()
        );
        assert_eq!(analyzer.analyze_terms("İ").unwrap(), vec!["i\u{307}"]);
    }

    #[test]
    fn test_case_sensitive_option() {
        let analyzer = StandardAnalyzer::with_options(WORD_PATTERN, false).unwrap();
        assert_eq!(analyzer.analyze_terms("God").unwrap(), vec!["God"]);
        assert!(StandardAnalyzer::with_options("[", true).is_err());
    }
}

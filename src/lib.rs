//! # Sieve
//!
//! A small Naive Bayes text classifier for short texts (comments, titles)
//! whose trained state can be saved and restored between sessions.
//!
//! ## Features
//!
//! - Regex word tokenizer with lowercasing
//! - Multinomial Naive Bayes with additive (Laplace) smoothing
//! - Log-space scoring with deterministic tie-breaking
//! - JSON and binary snapshots with checksummed framing
//! - File and in-memory snapshot stores
//! - A `sieve` command line tool for training and classification

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod error;

pub mod prelude {
    pub use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
    pub use crate::classifier::{
        ClassifierConfig, Model, ModelSnapshot, NaiveBayesClassifier, SnapshotFormat,
        TextClassifier,
    };
    pub use crate::error::{Result, SieveError};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

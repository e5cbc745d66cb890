//! Classifier configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::StandardAnalyzer;
use crate::analysis::tokenizer::regex::WORD_PATTERN;
use crate::classifier::snapshot::SnapshotFormat;
use crate::error::{Result, SieveError};

/// Configuration for a [`NaiveBayesClassifier`](super::NaiveBayesClassifier)
/// and the tooling around it.
///
/// Every field has a default, so a JSON config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Regex whose matches become tokens.
    pub token_pattern: String,
    /// Lowercase tokens before counting.
    pub lowercase: bool,
    /// Additive smoothing constant; 1.0 is Laplace smoothing.
    pub smoothing: f64,
    /// Encoding used when writing snapshots.
    pub snapshot_format: SnapshotFormat,
    /// Skip whitespace-only lines when loading training corpora.
    pub skip_blank_lines: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            token_pattern: WORD_PATTERN.to_string(),
            lowercase: true,
            smoothing: 1.0,
            snapshot_format: SnapshotFormat::Json,
            skip_blank_lines: true,
        }
    }
}

impl ClassifierConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ClassifierConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a usable classifier.
    pub fn validate(&self) -> Result<()> {
        if self.token_pattern.is_empty() {
            return Err(SieveError::invalid_config("token_pattern must not be empty"));
        }
        if !self.smoothing.is_finite() || self.smoothing <= 0.0 {
            return Err(SieveError::invalid_config(format!(
                "smoothing must be a positive finite number, got {}",
                self.smoothing
            )));
        }
        Ok(())
    }

    /// Build the analyzer this configuration describes.
    pub fn build_analyzer(&self) -> Result<StandardAnalyzer> {
        StandardAnalyzer::with_options(&self.token_pattern, self.lowercase)
    }
}

//! Common types for text classification.

use serde::{Deserialize, Serialize};

/// Labelled training sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Document text.
    pub text: String,
    /// Label the document belongs to.
    pub label: String,
}

impl TrainingSample {
    /// Create a new training sample.
    pub fn new<T: Into<String>, L: Into<String>>(text: T, label: L) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Log-space score of one label for one input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    /// Label name.
    pub label: String,
    /// `ln P(label) + Σ ln P(token | label)`.
    pub score: f64,
}

/// Summary of one batch of training.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Documents added.
    pub documents: u64,
    /// Token occurrences counted.
    pub tokens: u64,
    /// Distinct labels touched, in first-touched order.
    pub labels: Vec<String>,
}

impl TrainingReport {
    pub(crate) fn record(&mut self, label: &str, tokens: usize) {
        self.documents += 1;
        self.tokens += tokens as u64;
        if !self.labels.iter().any(|l| l == label) {
            self.labels.push(label.to_string());
        }
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: TrainingReport) {
        self.documents += other.documents;
        self.tokens += other.tokens;
        for label in other.labels {
            if !self.labels.contains(&label) {
                self.labels.push(label);
            }
        }
    }
}
